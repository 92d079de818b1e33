//! Dispatch table over computation kinds.

use crate::domain::types::SimulationOutput;
use crate::tasks::{
    DefaultComputation, ImageProcessing, MatrixMultiplication, NeuralNetworkInference,
};
use crate::{ComputationKind, ComputeError, EngineConfig, Simulation, SimulationPlan};

/// Routes an extracted [`SimulationPlan`] to the matching routine.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    matrix: MatrixMultiplication,
    neural_network: NeuralNetworkInference,
    image: ImageProcessing,
    default: DefaultComputation,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatcher whose routines honour the limits in `config`
    pub fn with_config(config: &EngineConfig) -> Self {
        Self {
            matrix: MatrixMultiplication::new(config.max_concurrent_matrix),
            ..Self::default()
        }
    }

    /// Matrix products that could start right now without waiting
    pub fn matrix_permits(&self) -> usize {
        self.matrix.available_permits()
    }

    /// Kind that will serve a raw `type` value
    pub fn select(kind: &str) -> ComputationKind {
        ComputationKind::parse(kind)
    }

    /// Run the routine for `plan`
    pub async fn dispatch(
        &self,
        data: &str,
        plan: SimulationPlan,
    ) -> Result<SimulationOutput, ComputeError> {
        tracing::debug!(kind = %plan.kind(), "Dispatching simulation");

        match plan {
            SimulationPlan::Matrix(params) => self.matrix.simulate(data, params).await,
            SimulationPlan::NeuralNetwork(params) => {
                self.neural_network.simulate(data, params).await
            }
            SimulationPlan::Image(params) => self.image.simulate(data, params).await,
            SimulationPlan::Default(params) => self.default.simulate(data, params).await,
        }
    }
}
