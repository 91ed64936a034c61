use crate::config::{to_funding_rounds, RoundInput, SUPPORTED_FORMATS};
use crate::core::validator::{MAX_ROUNDS, MIN_ROUNDS};
use crate::core::ConfigProvider;
use crate::domain::model::FundingRound;
use crate::utils::error::{CapTableError, Result};
use crate::utils::validation::{
    validate_formats, validate_path, validate_positive_number, validate_range, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub scenario: ScenarioConfig,
    pub rounds: Vec<RoundInput>,
    #[serde(default)]
    pub output: OutputConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub name: String,
    pub description: Option<String>,
    pub founder_shares: u64,
    pub strict: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: String,
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            formats: default_formats(),
        }
    }
}

fn default_output_path() -> String {
    "./output".to_string()
}

fn default_formats() -> Vec<String> {
    SUPPORTED_FORMATS.iter().map(|f| f.to_string()).collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入情境
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析情境
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content)
            .map_err(|e| CapTableError::config(format!("TOML parsing error: {}", e)))
    }

    /// 替換環境變數 (例如 ${SEED_PRE_MONEY})，找不到的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| CapTableError::config(format!("Invalid substitution pattern: {}", e)))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn verbose_logging(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }

    pub fn json_logging(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn scenario_name(&self) -> &str {
        &self.scenario.name
    }

    fn founder_shares(&self) -> u64 {
        self.scenario.founder_shares
    }

    fn rounds(&self) -> Vec<FundingRound> {
        to_funding_rounds(&self.rounds)
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn output_formats(&self) -> &[String] {
        &self.output.formats
    }

    fn strict(&self) -> bool {
        self.scenario.strict.unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_path("output.path", &self.output.path)?;
        validate_formats("output.formats", &self.output.formats, &SUPPORTED_FORMATS)?;
        validate_positive_number("scenario.founder_shares", self.scenario.founder_shares, 1)?;
        validate_range("rounds", self.rounds.len(), MIN_ROUNDS, MAX_ROUNDS)?;
        Ok(())
    }
}
