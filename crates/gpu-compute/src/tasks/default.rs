//! Default computation: a bounded trigonometric sum.

use super::run_blocking;
use crate::domain::types::{DefaultOutput, SimulationOutput};
use crate::{ComputationKind, ComputeError, DefaultParams, Simulation};
use rand::Rng;

/// Upper bound on loop iterations actually executed
pub const MAX_EXECUTED_ITERATIONS: u64 = 100_000;

/// Fallback routine for unknown or missing kinds
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultComputation;

#[async_trait::async_trait]
impl Simulation for DefaultComputation {
    type Params = DefaultParams;
    type Output = SimulationOutput;

    fn kind(&self) -> ComputationKind {
        ComputationKind::Default
    }

    async fn simulate(
        &self,
        data: &str,
        params: DefaultParams,
    ) -> Result<SimulationOutput, ComputeError> {
        // The echoed `iterations` stays uncapped; only the loop is bounded.
        let executed = params.iterations.min(MAX_EXECUTED_ITERATIONS);
        let computed_result = run_blocking(move || trig_sum(executed)).await?;

        Ok(SimulationOutput::Default(DefaultOutput {
            operation: self.kind().operation(),
            input_data: data.to_string(),
            iterations: params.iterations,
            computed_result,
            data_length: data.chars().count(),
            random_number: rand::thread_rng().gen_range(1..=1000),
        }))
    }
}

/// Σ sin(i)·cos(i) for i in [0, n)
fn trig_sum(n: u64) -> f64 {
    (0..n)
        .map(|i| {
            let x = i as f64;
            x.sin() * x.cos()
        })
        .sum()
}
