use crate::core::Pipeline;
use crate::domain::model::{ScenarioInput, ScenarioReport};
use crate::utils::error::Result;

#[derive(Debug, Clone)]
pub struct SimulationOutcome {
    pub report: ScenarioReport,
    pub outputs: Vec<String>,
}

pub struct SimulationEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> SimulationEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Extract only; used for dry runs.
    pub async fn preview(&self) -> Result<ScenarioInput> {
        self.pipeline.extract().await
    }

    pub async fn run(&self) -> Result<SimulationOutcome> {
        tracing::info!("🚀 Starting cap table simulation");

        let input = self.pipeline.extract().await?;
        tracing::info!(
            "📥 Loaded scenario '{}': {} founder shares, {} rounds",
            input.name,
            input.founder_shares,
            input.rounds.len()
        );

        let report = self.pipeline.transform(input).await?;
        tracing::info!(
            "🧮 Computed {} rows per policy, {} comparison rows",
            report.dilution.rows.len(),
            report.comparison.rows.len()
        );

        let outputs = self.pipeline.load(&report).await?;
        tracing::info!("💾 Wrote {} report files", outputs.len());

        Ok(SimulationOutcome { report, outputs })
    }
}
