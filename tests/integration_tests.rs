use anyhow::Result;
use cap_table_sim::core::ConfigProvider;
use cap_table_sim::utils::validation::Validate;
use cap_table_sim::{
    CapTableError, CapTablePipeline, LocalStorage, OwnershipClass, SimulationEngine, TomlConfig,
};
use tempfile::TempDir;

fn scenario_toml(output_path: &str, strict: bool) -> String {
    // 將 Windows 路徑中的反斜杠轉為正斜杠以避免 TOML 解析問題
    let normalized_path = output_path.replace('\\', "/");
    format!(
        r#"
[scenario]
name = "Seed to Series B"
description = "Three priced rounds"
founder_shares = 10000000
strict = {}

[[rounds]]
pre_money = "8M"
investment = "2M"

[[rounds]]
pre_money = "20M"
investment = "5M"

[[rounds]]
pre_money = "60M"
investment = "15M"

[output]
path = "{}"
formats = ["csv", "json"]
"#,
        strict, normalized_path
    )
}

#[tokio::test]
async fn test_end_to_end_simulation_writes_reports() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let config = TomlConfig::from_toml_str(&scenario_toml(&output_path, false))?;
    config.validate()?;

    let storage = LocalStorage::new(config.output_path().to_string());
    let engine = SimulationEngine::new(CapTablePipeline::new(storage, config));
    let outcome = engine.run().await?;

    assert_eq!(outcome.outputs.len(), 6);
    for name in [
        "seed-to-series-b_dilution.csv",
        "seed-to-series-b_pro-rata.csv",
        "seed-to-series-b_comparison.csv",
        "seed-to-series-b_dilution.json",
        "seed-to-series-b_pro-rata.json",
        "seed-to-series-b_comparison.json",
    ] {
        assert!(temp_dir.path().join(name).exists(), "missing {}", name);
    }

    let csv_text = std::fs::read_to_string(temp_dir.path().join("seed-to-series-b_dilution.csv"))?;
    assert_eq!(csv_text.lines().count(), 5);
    assert!(csv_text.contains("Series B %"));

    let json: serde_json::Value = serde_json::from_slice(&std::fs::read(
        temp_dir.path().join("seed-to-series-b_pro-rata.json"),
    )?)?;
    assert_eq!(json["scenario"], "Seed to Series B");
    assert_eq!(json["rows"].as_array().map(Vec::len), Some(4));

    let report = &outcome.report;
    let seed = OwnershipClass::Investor(1);
    let seed_entry = report.pro_rata.rows[1].ownership_pct(seed);
    let seed_final = report.pro_rata.rows[3].ownership_pct(seed);
    assert!((seed_entry - seed_final).abs() <= 0.01);
    assert!(report.dilution.rows[3].ownership_pct(seed) < seed_entry);

    Ok(())
}

#[tokio::test]
async fn test_preview_does_not_write() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().join("reports");
    let output_path = output_path.to_str().unwrap().to_string();

    let config = TomlConfig::from_toml_str(&scenario_toml(&output_path, false))?;
    let storage = LocalStorage::new(config.output_path().to_string());
    let engine = SimulationEngine::new(CapTablePipeline::new(storage, config));

    let input = engine.preview().await?;
    assert_eq!(input.rounds.len(), 3);
    assert_eq!(input.founder_shares, 10_000_000);
    assert!(!temp_dir.path().join("reports").exists());

    Ok(())
}

#[tokio::test]
async fn test_strict_scenario_fails_on_unpriced_round() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let toml = scenario_toml(&output_path, true).replacen("pre_money = \"20M\"", "pre_money = 0", 1);
    let config = TomlConfig::from_toml_str(&toml)?;
    let storage = LocalStorage::new(config.output_path().to_string());
    let engine = SimulationEngine::new(CapTablePipeline::new(storage, config));

    let err = engine.run().await.unwrap_err();
    assert!(matches!(err, CapTableError::DegenerateRoundError { round: 2, .. }));
    assert!(std::fs::read_dir(temp_dir.path())?.next().is_none());

    Ok(())
}

#[tokio::test]
async fn test_lenient_scenario_issues_no_shares_for_unpriced_round() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let toml = scenario_toml(&output_path, false).replacen("pre_money = \"20M\"", "pre_money = 0", 1);
    let config = TomlConfig::from_toml_str(&toml)?;
    let storage = LocalStorage::new(config.output_path().to_string());
    let engine = SimulationEngine::new(CapTablePipeline::new(storage, config));

    let outcome = engine.run().await?;
    let unpriced = &outcome.report.dilution.rows[2];
    assert_eq!(unpriced.new_shares, 0.0);
    assert_eq!(unpriced.price_per_share, 0.0);
    assert_eq!(unpriced.total_shares, outcome.report.dilution.rows[1].total_shares);

    Ok(())
}
