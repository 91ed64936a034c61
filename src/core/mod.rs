pub mod allocator;
pub mod builder;
pub mod cap_table;
pub mod comparator;
pub mod engine;
pub mod validator;
pub mod valuation;

pub use crate::domain::model::{
    AllocationPolicy, CapTableRow, ComparisonRow, FundingRound, OwnershipClass, ScenarioComparison,
    ScenarioInput, ScenarioReport,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
