use thiserror::Error;

#[derive(Error, Debug)]
pub enum CapTableError {
    #[error("Validation error on {field} ({value}): {reason}")]
    ValidationError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Mismatched scenarios: {reason}")]
    MismatchedScenarioError { reason: String },

    #[error("Degenerate round {round}: {reason}")]
    DegenerateRoundError { round: usize, reason: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Background task failed: {0}")]
    TaskError(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Config,
    Output,
    Runtime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CapTableError {
    pub fn validation(
        field: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::ValidationError {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn mismatched(reason: impl Into<String>) -> Self {
        Self::MismatchedScenarioError {
            reason: reason.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ValidationError { .. }
            | Self::MismatchedScenarioError { .. }
            | Self::DegenerateRoundError { .. } => ErrorCategory::Input,
            Self::ConfigError { .. } => ErrorCategory::Config,
            Self::IoError(_) | Self::CsvError(_) | Self::SerializationError(_) => {
                ErrorCategory::Output
            }
            Self::TaskError(_) => ErrorCategory::Runtime,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ValidationError { .. }
            | Self::DegenerateRoundError { .. }
            | Self::MismatchedScenarioError { .. }
            | Self::ConfigError { .. } => ErrorSeverity::High,
            // 輸出失敗時計算結果仍然有效，可以重試
            Self::IoError(_) | Self::CsvError(_) | Self::SerializationError(_) => {
                ErrorSeverity::Medium
            }
            Self::TaskError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ValidationError { .. } => {
                "Provide between 1 and 25 rounds with non-negative pre-money and investment amounts"
            }
            Self::MismatchedScenarioError { .. } => {
                "Compare tables generated from the same founder shares and round inputs"
            }
            Self::DegenerateRoundError { .. } => {
                "Give every funded round a positive pre-money valuation, or disable --strict"
            }
            Self::ConfigError { .. } => "Check the scenario file syntax and field names",
            Self::IoError(_) => "Check that the output directory exists and is writable",
            Self::CsvError(_) | Self::SerializationError(_) => {
                "Retry the export; if it keeps failing, try a different output format"
            }
            Self::TaskError(_) => "Re-run the simulation; this indicates an internal failure",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ValidationError { field, reason, .. } => {
                format!("Invalid input for '{}': {}", field, reason)
            }
            Self::MismatchedScenarioError { reason } => {
                format!("Cannot compare scenarios: {}", reason)
            }
            Self::DegenerateRoundError { round, reason } => {
                format!("Round {} cannot be priced: {}", round, reason)
            }
            Self::ConfigError { message } => format!("Configuration problem: {}", message),
            Self::TaskError(e) => format!("Simulation stopped unexpectedly: {}", e),
            other => format!("Failed to write reports: {}", other),
        }
    }
}

pub type Result<T> = std::result::Result<T, CapTableError>;
