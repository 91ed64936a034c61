use anyhow::Context;
use cap_table_sim::app::report;
use cap_table_sim::core::ConfigProvider;
use cap_table_sim::domain::model::ScenarioInput;
use cap_table_sim::utils::error::{CapTableError, ErrorSeverity};
use cap_table_sim::utils::{logger, validation::Validate};
use cap_table_sim::{
    CapTablePipeline, CliConfig, LocalStorage, SimulationEngine, SimulationOutcome, TomlConfig,
};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliConfig::parse();

    // 先載入情境檔，日誌設定可能來自檔案
    let scenario = match &args.config {
        Some(path) => {
            let mut config = TomlConfig::from_file(path)
                .with_context(|| format!("Failed to load scenario file '{}'", path))?;
            if args.strict {
                config.scenario.strict = Some(true);
            }
            Some(config)
        }
        None => None,
    };

    let verbose = args.verbose || scenario.as_ref().is_some_and(|s| s.verbose_logging());
    let json = args.log_json || scenario.as_ref().is_some_and(|s| s.json_logging());
    if json {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!("Starting cap-table CLI");
    for flag in args.ignored_by_scenario_file() {
        tracing::warn!("⚠️ {} is ignored because --config was given", flag);
        eprintln!("⚠️ {} is ignored; the scenario file defines it", flag);
    }
    if verbose {
        tracing::debug!("CLI config: {:?}", args);
    }

    let dry_run = args.dry_run;
    let exit_code = match scenario {
        Some(config) => run(config, dry_run).await,
        None => run(args, dry_run).await,
    };

    if exit_code > 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}

async fn run<C: ConfigProvider + Validate>(config: C, dry_run: bool) -> i32 {
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        return 1;
    }
    tracing::info!("✅ Configuration validated");

    let output_path = config.output_path().to_string();
    let storage = LocalStorage::new(output_path.clone());
    let pipeline = CapTablePipeline::new(storage, config);
    let engine = SimulationEngine::new(pipeline);

    if dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be computed or written");
        return match engine.preview().await {
            Ok(input) => {
                display_rounds(&input, &output_path);
                0
            }
            Err(e) => report_failure(&e),
        };
    }

    match engine.run().await {
        Ok(outcome) => {
            display_outcome(&outcome);
            0
        }
        Err(e) => report_failure(&e),
    }
}

fn report_failure(e: &CapTableError) -> i32 {
    tracing::error!(
        "❌ Simulation failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn display_rounds(input: &ScenarioInput, output_path: &str) {
    println!("📋 Scenario: {}", input.name);
    println!("  Founder shares: {}", input.founder_shares);
    for round in &input.rounds {
        println!(
            "  {:<10} pre-money {:>16.0}  investment {:>16.0}",
            round.class().label(),
            round.pre_money_valuation,
            round.investment_amount
        );
    }
    println!("  Output: {}", output_path);
    println!();
}

fn display_outcome(outcome: &SimulationOutcome) {
    let report_data = &outcome.report;

    println!("{}", report::render_text_table(&report_data.dilution));
    println!("{}", report::render_text_table(&report_data.pro_rata));

    println!("⚖️ Pro-rata vs dilution (final round):");
    let last_round = report_data
        .dilution
        .rows
        .last()
        .map(|row| row.label.as_str())
        .unwrap_or_default();
    for row in report_data
        .comparison
        .rows
        .iter()
        .filter(|row| row.round == last_round)
    {
        println!(
            "  {:<10} {:>8.2}% -> {:>8.2}%  ({:+.2})",
            row.class.label(),
            row.dilution_pct,
            row.pro_rata_pct,
            row.delta
        );
    }
    println!(
        "  Founder dilution saved: {:.2}%",
        report_data.comparison.founder_dilution_saved
    );
    println!();

    for path in &outcome.outputs {
        println!("📁 {}", path);
    }
}
