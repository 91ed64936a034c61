use crate::domain::model::{FundingRound, ScenarioInput, ScenarioReport};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn scenario_name(&self) -> &str;
    fn founder_shares(&self) -> u64;
    fn rounds(&self) -> Vec<FundingRound>;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn strict(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<ScenarioInput>;
    async fn transform(&self, input: ScenarioInput) -> Result<ScenarioReport>;
    async fn load(&self, report: &ScenarioReport) -> Result<Vec<String>>;
}
