//! Computation kinds selected through the `type` parameter.

use super::params::Parameters;
use serde::Serialize;

/// Parameter key holding the kind name
pub const TYPE_KEY: &str = "type";

/// Category of simulated work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComputationKind {
    MatrixMultiplication,
    NeuralNetwork,
    ImageProcessing,
    Default,
}

impl ComputationKind {
    /// All kinds, in dispatch-table order
    pub const ALL: [ComputationKind; 4] = [
        ComputationKind::MatrixMultiplication,
        ComputationKind::NeuralNetwork,
        ComputationKind::ImageProcessing,
        ComputationKind::Default,
    ];

    /// Resolve a kind name. Unrecognized names fall back to [`ComputationKind::Default`].
    pub fn parse(name: &str) -> Self {
        match name {
            "matrix_multiplication" => ComputationKind::MatrixMultiplication,
            "neural_network" => ComputationKind::NeuralNetwork,
            "image_processing" => ComputationKind::ImageProcessing,
            _ => ComputationKind::Default,
        }
    }

    /// Resolve the kind from a parameter map.
    ///
    /// A missing `type`, or one that is not a string, selects the default kind.
    pub fn from_parameters(parameters: &Parameters) -> Self {
        parameters
            .get(TYPE_KEY)
            .and_then(|value| value.as_str())
            .map(Self::parse)
            .unwrap_or(ComputationKind::Default)
    }

    /// Name accepted in the `type` parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            ComputationKind::MatrixMultiplication => "matrix_multiplication",
            ComputationKind::NeuralNetwork => "neural_network",
            ComputationKind::ImageProcessing => "image_processing",
            ComputationKind::Default => "default",
        }
    }

    /// Value reported in the result's `operation` field
    pub fn operation(&self) -> &'static str {
        match self {
            ComputationKind::MatrixMultiplication => "matrix_multiplication",
            ComputationKind::NeuralNetwork => "neural_network_inference",
            ComputationKind::ImageProcessing => "image_processing",
            ComputationKind::Default => "default_computation",
        }
    }
}

impl std::fmt::Display for ComputationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
