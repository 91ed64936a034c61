pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;
pub use config::toml_config::TomlConfig;

pub use adapters::storage::LocalStorage;
pub use app::pipelines::cap_table_pipeline::CapTablePipeline;
pub use core::allocator::EngineOptions;
pub use core::cap_table::{generate_cap_table, generate_cap_table_with};
pub use core::comparator::compare_scenarios;
pub use core::engine::{SimulationEngine, SimulationOutcome};
pub use domain::model::{
    AllocationPolicy, CapTableRow, ComparisonRow, FundingRound, OwnershipClass,
    ScenarioComparison,
};
pub use utils::error::{CapTableError, Result};
