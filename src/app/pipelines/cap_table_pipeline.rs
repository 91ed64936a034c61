use crate::app::report;
use crate::core::allocator::EngineOptions;
use crate::core::cap_table::run_policy;
use crate::core::comparator::compare_scenarios;
use crate::core::validator::{validate_founder_shares, validate_rounds};
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::{AllocationPolicy, ScenarioInput, ScenarioReport};
use crate::utils::error::{CapTableError, Result};

pub struct CapTablePipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> CapTablePipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    async fn write(&self, file_name: String, data: Vec<u8>) -> Result<String> {
        self.storage.write_file(&file_name, &data).await?;
        tracing::debug!("Wrote {} ({} bytes)", file_name, data.len());
        Ok(format!("{}/{}", self.config.output_path(), file_name))
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CapTablePipeline<S, C> {
    async fn extract(&self) -> Result<ScenarioInput> {
        let founder_shares = self.config.founder_shares();
        validate_founder_shares(founder_shares)?;

        let rounds = self.config.rounds();
        validate_rounds(&rounds)?;

        for round in &rounds {
            tracing::debug!(
                "Round {} ({}): pre-money {}, investment {}",
                round.sequence_index,
                round.class(),
                round.pre_money_valuation,
                round.investment_amount
            );
        }

        Ok(ScenarioInput {
            name: self.config.scenario_name().to_string(),
            founder_shares,
            rounds,
        })
    }

    async fn transform(&self, input: ScenarioInput) -> Result<ScenarioReport> {
        let options = EngineOptions {
            strict: self.config.strict(),
        };

        // 兩個政策各自擁有狀態，可以平行計算
        let dilution_task = {
            let rounds = input.rounds.clone();
            let founder_shares = input.founder_shares;
            tokio::task::spawn_blocking(move || {
                run_policy(founder_shares, &rounds, AllocationPolicy::Dilution, options)
            })
        };
        let pro_rata_task = {
            let rounds = input.rounds.clone();
            let founder_shares = input.founder_shares;
            tokio::task::spawn_blocking(move || {
                run_policy(founder_shares, &rounds, AllocationPolicy::ProRata, options)
            })
        };

        let (dilution, pro_rata) = tokio::try_join!(dilution_task, pro_rata_task)?;
        let dilution = dilution?;
        let pro_rata = pro_rata?;

        let comparison = compare_scenarios(&dilution.rows, &pro_rata.rows)?;
        tracing::info!(
            "⚖️ Founder ends at {:.2}% under dilution, {:.2}% under pro-rata",
            dilution.summary.founder_pct,
            pro_rata.summary.founder_pct
        );

        Ok(ScenarioReport {
            input,
            dilution,
            pro_rata,
            comparison,
        })
    }

    async fn load(&self, result: &ScenarioReport) -> Result<Vec<String>> {
        let stem = report::file_stem(&result.input.name);
        let mut outputs = Vec::new();

        for format in self.config.output_formats() {
            match format.as_str() {
                "csv" => {
                    for run in [&result.dilution, &result.pro_rata] {
                        let data = report::render_rows_csv(&run.rows)?;
                        outputs.push(
                            self.write(format!("{}_{}.csv", stem, run.policy.slug()), data)
                                .await?,
                        );
                    }
                    let data = report::render_comparison_csv(&result.comparison)?;
                    outputs.push(self.write(format!("{}_comparison.csv", stem), data).await?);
                }
                "json" => {
                    for run in [&result.dilution, &result.pro_rata] {
                        let data = report::render_policy_json(&result.input.name, run)?;
                        outputs.push(
                            self.write(format!("{}_{}.json", stem, run.policy.slug()), data)
                                .await?,
                        );
                    }
                    let data =
                        report::render_comparison_json(&result.input.name, &result.comparison)?;
                    outputs.push(self.write(format!("{}_comparison.json", stem), data).await?);
                }
                other => {
                    return Err(CapTableError::validation(
                        "output_formats",
                        other,
                        "Unsupported format",
                    ));
                }
            }
        }

        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::FundingRound;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }

        async fn file_names(&self) -> Vec<String> {
            let files = self.files.lock().await;
            let mut names: Vec<String> = files.keys().cloned().collect();
            names.sort();
            names
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct StaticConfig {
        founder_shares: u64,
        rounds: Vec<FundingRound>,
        formats: Vec<String>,
        strict: bool,
    }

    impl StaticConfig {
        fn new(rounds: &[(f64, f64)]) -> Self {
            Self {
                founder_shares: 10_000_000,
                rounds: crate::domain::model::rounds_from_pairs(rounds),
                formats: vec!["csv".to_string(), "json".to_string()],
                strict: false,
            }
        }
    }

    impl ConfigProvider for StaticConfig {
        fn scenario_name(&self) -> &str {
            "Pipeline Test"
        }

        fn founder_shares(&self) -> u64 {
            self.founder_shares
        }

        fn rounds(&self) -> Vec<FundingRound> {
            self.rounds.clone()
        }

        fn output_path(&self) -> &str {
            "/virtual"
        }

        fn output_formats(&self) -> &[String] {
            &self.formats
        }

        fn strict(&self) -> bool {
            self.strict
        }
    }

    #[tokio::test]
    async fn test_extract_validates_rounds() {
        let pipeline = CapTablePipeline::new(MockStorage::new(), StaticConfig::new(&[]));
        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, CapTableError::ValidationError { .. }));
    }

    #[tokio::test]
    async fn test_transform_runs_both_policies() {
        let pipeline = CapTablePipeline::new(
            MockStorage::new(),
            StaticConfig::new(&[(8_000_000.0, 2_000_000.0), (20_000_000.0, 5_000_000.0)]),
        );

        let input = pipeline.extract().await.unwrap();
        let report = pipeline.transform(input).await.unwrap();

        assert_eq!(report.dilution.policy, AllocationPolicy::Dilution);
        assert_eq!(report.pro_rata.policy, AllocationPolicy::ProRata);
        assert_eq!(report.dilution.rows.len(), 3);
        assert_eq!(report.pro_rata.rows.len(), 3);
        assert!(!report.comparison.rows.is_empty());
    }

    #[tokio::test]
    async fn test_transform_surfaces_strict_failure() {
        let mut config = StaticConfig::new(&[(0.0, 1_000_000.0)]);
        config.strict = true;
        let pipeline = CapTablePipeline::new(MockStorage::new(), config);

        let input = pipeline.extract().await.unwrap();
        let err = pipeline.transform(input).await.unwrap_err();
        assert!(matches!(err, CapTableError::DegenerateRoundError { round: 1, .. }));
    }

    #[tokio::test]
    async fn test_load_writes_every_format() {
        let storage = MockStorage::new();
        let pipeline = CapTablePipeline::new(
            storage.clone(),
            StaticConfig::new(&[(8_000_000.0, 1_410_000.0)]),
        );

        let input = pipeline.extract().await.unwrap();
        let report = pipeline.transform(input).await.unwrap();
        let outputs = pipeline.load(&report).await.unwrap();

        assert_eq!(outputs.len(), 6);
        assert!(outputs.contains(&"/virtual/pipeline-test_dilution.csv".to_string()));
        assert_eq!(
            storage.file_names().await,
            vec![
                "pipeline-test_comparison.csv",
                "pipeline-test_comparison.json",
                "pipeline-test_dilution.csv",
                "pipeline-test_dilution.json",
                "pipeline-test_pro-rata.csv",
                "pipeline-test_pro-rata.json",
            ]
        );

        let stored = storage
            .get_file("pipeline-test_pro-rata.json")
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&stored).unwrap();
        assert_eq!(json["policy"], "pro-rata");
    }
}
