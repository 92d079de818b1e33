//! Neural network inference simulation. Nothing is inferred; every number is sampled.

use super::round_to;
use crate::domain::types::{NeuralNetworkOutput, SimulationOutput};
use crate::{ComputationKind, ComputeError, NeuralNetworkParams, Simulation};
use rand::Rng;
use std::time::Duration;

/// Extra latency on top of the engine's base delay
pub const NEURAL_NETWORK_LATENCY: Duration = Duration::from_millis(500);

/// Neural network inference routine
#[derive(Debug, Clone, Copy)]
pub struct NeuralNetworkInference {
    latency: Duration,
}

impl NeuralNetworkInference {
    pub fn new() -> Self {
        Self {
            latency: NEURAL_NETWORK_LATENCY,
        }
    }
}

impl Default for NeuralNetworkInference {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Simulation for NeuralNetworkInference {
    type Params = NeuralNetworkParams;
    type Output = SimulationOutput;

    fn kind(&self) -> ComputationKind {
        ComputationKind::NeuralNetwork
    }

    async fn simulate(
        &self,
        data: &str,
        params: NeuralNetworkParams,
    ) -> Result<SimulationOutput, ComputeError> {
        tokio::time::sleep(self.latency).await;

        let mut rng = rand::thread_rng();
        Ok(SimulationOutput::NeuralNetwork(NeuralNetworkOutput {
            operation: self.kind().operation(),
            input_data: data.to_string(),
            layers: params.layers,
            batch_size: params.batch_size,
            predicted_class: rng.gen_range(0..=9),
            confidence: round_to(rng.gen_range(0.70..=0.99), 4),
            inference_time_ms: round_to(rng.gen_range(10.0..=50.0), 2),
        }))
    }
}
