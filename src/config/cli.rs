use crate::config::{parse_amount, to_funding_rounds, RoundInput, SUPPORTED_FORMATS};
use crate::core::validator::{MAX_ROUNDS, MIN_ROUNDS};
use crate::core::ConfigProvider;
use crate::domain::model::FundingRound;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_formats, validate_path, validate_positive_number, validate_range, Validate,
};
use clap::Parser;
use serde::{Deserialize, Serialize};

const DEFAULT_NAME: &str = "scenario";
const DEFAULT_FOUNDER_SHARES: u64 = 10_000_000;
const DEFAULT_OUTPUT_PATH: &str = "./output";

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "cap-table")]
#[command(about = "Simulate cap table dilution with and without pro-rata rights")]
pub struct CliConfig {
    /// Path to a TOML scenario file; replaces the round flags below
    #[arg(short, long)]
    pub config: Option<String>,

    /// Scenario name used for report file names [default: scenario]
    #[arg(long)]
    pub name: Option<String>,

    /// Shares issued to the founder at formation [default: 10000000]
    #[arg(long)]
    pub founder_shares: Option<u64>,

    /// Funding round as PRE_MONEY:INVESTMENT, e.g. 8M:1.41M (repeat per round)
    #[arg(long = "round", value_parser = parse_round)]
    pub rounds: Vec<RoundInput>,

    /// Directory reports are written to [default: ./output]
    #[arg(long)]
    pub output_path: Option<String>,

    #[arg(long, value_delimiter = ',', default_value = "csv,json")]
    pub formats: Vec<String>,

    /// Fail on rounds that cannot be priced instead of issuing zero shares
    #[arg(long)]
    pub strict: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    /// Validate and print the rounds without computing or writing anything
    #[arg(long)]
    pub dry_run: bool,
}

impl CliConfig {
    /// Flags given alongside `--config` that the scenario file overrides.
    pub fn ignored_by_scenario_file(&self) -> Vec<&'static str> {
        if self.config.is_none() {
            return Vec::new();
        }

        let mut ignored = Vec::new();
        if self.name.is_some() {
            ignored.push("--name");
        }
        if self.founder_shares.is_some() {
            ignored.push("--founder-shares");
        }
        if !self.rounds.is_empty() {
            ignored.push("--round");
        }
        if self.output_path.is_some() {
            ignored.push("--output-path");
        }
        ignored
    }
}

pub fn parse_round(raw: &str) -> std::result::Result<RoundInput, String> {
    let (pre_money, investment) = raw
        .split_once(':')
        .ok_or_else(|| format!("'{}' should look like PRE_MONEY:INVESTMENT", raw))?;

    Ok(RoundInput {
        pre_money: parse_amount(pre_money)?,
        investment: parse_amount(investment)?,
    })
}

impl ConfigProvider for CliConfig {
    fn scenario_name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_NAME)
    }

    fn founder_shares(&self) -> u64 {
        self.founder_shares.unwrap_or(DEFAULT_FOUNDER_SHARES)
    }

    fn rounds(&self) -> Vec<FundingRound> {
        to_funding_rounds(&self.rounds)
    }

    fn output_path(&self) -> &str {
        self.output_path.as_deref().unwrap_or(DEFAULT_OUTPUT_PATH)
    }

    fn output_formats(&self) -> &[String] {
        &self.formats
    }

    fn strict(&self) -> bool {
        self.strict
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("output_path", self.output_path())?;
        validate_formats("formats", &self.formats, &SUPPORTED_FORMATS)?;
        validate_positive_number("founder_shares", self.founder_shares(), 1)?;
        validate_range("rounds", self.rounds.len(), MIN_ROUNDS, MAX_ROUNDS)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round() {
        let round = parse_round("8M:1.41M").unwrap();
        assert_eq!(round.pre_money, 8_000_000.0);
        assert!((round.investment - 1_410_000.0).abs() < 1e-6);

        assert!(parse_round("8M").is_err());
        assert!(parse_round("8M:abc").is_err());
    }

    #[test]
    fn test_cli_parsing() {
        let config = CliConfig::try_parse_from([
            "cap-table",
            "--founder-shares",
            "5000000",
            "--round",
            "1M:2M",
            "--round",
            "5M:5M",
            "--formats",
            "json",
            "--strict",
        ])
        .unwrap();

        assert_eq!(config.founder_shares(), 5_000_000);
        assert_eq!(config.rounds().len(), 2);
        assert_eq!(config.rounds()[1].sequence_index, 2);
        assert_eq!(config.output_formats(), ["json".to_string()]);
        assert!(config.strict());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_defaults() {
        let config = CliConfig::try_parse_from(["cap-table", "--round", "1M:1M"]).unwrap();
        assert_eq!(config.scenario_name(), "scenario");
        assert_eq!(config.founder_shares(), 10_000_000);
        assert_eq!(config.output_path(), "./output");
        assert!(config.ignored_by_scenario_file().is_empty());
    }

    #[test]
    fn test_flags_overridden_by_scenario_file_are_reported() {
        let config = CliConfig::try_parse_from([
            "cap-table",
            "--config",
            "scenarios/seed-to-series-b.toml",
            "--round",
            "1M:2M",
            "--founder-shares",
            "5000000",
            "--strict",
        ])
        .unwrap();

        assert_eq!(
            config.ignored_by_scenario_file(),
            vec!["--founder-shares", "--round"]
        );
    }

    #[test]
    fn test_scenario_file_alone_ignores_nothing() {
        let config = CliConfig::try_parse_from([
            "cap-table",
            "--config",
            "scenarios/seed-to-series-b.toml",
            "--verbose",
        ])
        .unwrap();
        assert!(config.ignored_by_scenario_file().is_empty());
    }

    #[test]
    fn test_cli_validation_requires_rounds() {
        let config = CliConfig::try_parse_from(["cap-table"]).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cli_validation_rejects_unknown_format() {
        let config =
            CliConfig::try_parse_from(["cap-table", "--round", "1M:1M", "--formats", "pdf"])
                .unwrap();
        assert!(config.validate().is_err());
    }
}
