//! Computation engine: orchestrates one request end-to-end.

use crate::domain::types::{
    BatchEntry, BatchReport, ComputationOutcome, ComputationRequest, ComputationResult,
    SimulationOutput, StatusSnapshot,
};
use crate::{ComputationKind, ComputeError, Dispatcher, EngineConfig, Parameters, SimulationPlan};
use rand::Rng;
use tokio::time::Instant;
use tracing::{debug, warn};
use uuid::Uuid;

/// Process-wide engine. Holds immutable configuration plus the matrix
/// permits, so one instance can be shared (`Arc<ComputeEngine>`) by every
/// concurrent request and the matrix bound applies across all of them.
#[derive(Debug, Clone)]
pub struct ComputeEngine {
    config: EngineConfig,
    dispatcher: Dispatcher,
}

impl ComputeEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            dispatcher: Dispatcher::with_config(&config),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run one computation. Never fails: errors become the failure side of
    /// the envelope.
    pub async fn run(&self, data: &str, parameters: &Parameters) -> ComputationResult {
        let started = Instant::now();
        let request_id = Uuid::new_v4();
        let kind = ComputationKind::from_parameters(parameters);

        let outcome = match self.execute(kind, data, parameters).await {
            Ok(output) => ComputationOutcome::Success(output),
            Err(e) => {
                warn!(%request_id, %kind, error = %e, "Computation failed");
                ComputationOutcome::Failure(e.to_string())
            }
        };

        let computation_time = started.elapsed().as_secs_f64();
        debug!(%request_id, %kind, computation_time, "Computation finished");

        ComputationResult::new(request_id, outcome, computation_time)
    }

    async fn execute(
        &self,
        kind: ComputationKind,
        data: &str,
        parameters: &Parameters,
    ) -> Result<SimulationOutput, ComputeError> {
        tokio::time::sleep(self.config.simulate_delay).await;

        let plan = SimulationPlan::extract(kind, parameters, &self.config)?;
        self.dispatcher.dispatch(data, plan).await
    }

    /// Run requests strictly one after another, in input order.
    ///
    /// An entry's `success` means the item ran to completion. `run` always
    /// completes, so every entry counts as successful; per-item outcome is
    /// the inner envelope's own `success`.
    pub async fn run_batch(&self, requests: &[ComputationRequest]) -> BatchReport {
        let mut results = Vec::with_capacity(requests.len());

        for (index, request) in requests.iter().enumerate() {
            let result = self.run(&request.data, &request.parameters).await;
            results.push(BatchEntry {
                index,
                success: true,
                result,
            });
        }

        BatchReport::from_entries(results)
    }

    /// Synthetic device health. Nothing is sensed; values are random per call.
    pub fn status(&self) -> StatusSnapshot {
        let mut rng = rand::thread_rng();

        StatusSnapshot {
            gpu_available: self.config.gpu_available,
            max_computation_time: self.config.max_computation_time.as_secs(),
            simulate_delay: self.config.simulate_delay.as_secs_f64(),
            gpu_memory_usage: format!("{}%", rng.gen_range(10..=80)),
            gpu_temperature: format!("{}°C", rng.gen_range(35..=75)),
            active_processes: rng.gen_range(0..=3),
        }
    }
}
