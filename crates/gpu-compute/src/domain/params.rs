//! Typed parameter extraction.
//!
//! Requests carry a free-form JSON map. Before dispatch it is turned into a
//! typed record for the selected kind: missing keys (or explicit `null`) take
//! the documented defaults and unknown keys are ignored. Values a routine
//! actually computes with must be non-negative integers, otherwise extraction
//! fails with [`ComputeError::InvalidParameter`]; echo-only values (`layers`,
//! `batch_size`) accept any JSON value.

use super::kind::ComputationKind;
use crate::{ComputeError, EngineConfig};
use serde_json::Value;

/// Free-form request parameters
pub type Parameters = serde_json::Map<String, Value>;

pub const DEFAULT_MATRIX_SIZE: u64 = 100;
pub const DEFAULT_LAYERS: u64 = 3;
pub const DEFAULT_BATCH_SIZE: u64 = 32;
pub const DEFAULT_WIDTH: u64 = 1920;
pub const DEFAULT_HEIGHT: u64 = 1080;
pub const DEFAULT_ITERATIONS: u64 = 1_000_000;

/// Matrix multiplication parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatrixParams {
    /// Side length N of both operands
    pub size: usize,
}

/// Neural network inference parameters. Echoed as given, any JSON value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeuralNetworkParams {
    pub layers: Value,
    pub batch_size: Value,
}

/// Image processing parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageParams {
    pub width: u64,
    pub height: u64,
    /// `width * height`, checked at extraction
    pub pixels: u64,
}

/// Default computation parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultParams {
    /// Requested iteration count, reported as-is even when the loop is capped
    pub iterations: u64,
}

/// A kind together with its extracted parameters, ready for dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulationPlan {
    Matrix(MatrixParams),
    NeuralNetwork(NeuralNetworkParams),
    Image(ImageParams),
    Default(DefaultParams),
}

impl SimulationPlan {
    /// Extract the typed parameter record for `kind`.
    pub fn extract(
        kind: ComputationKind,
        parameters: &Parameters,
        config: &EngineConfig,
    ) -> Result<Self, ComputeError> {
        let plan = match kind {
            ComputationKind::MatrixMultiplication => {
                let size = read_u64(parameters, "matrix_size", DEFAULT_MATRIX_SIZE)?;
                let size = usize::try_from(size)
                    .ok()
                    .filter(|size| *size <= config.max_matrix_size)
                    .ok_or_else(|| {
                        ComputeError::invalid(
                            "matrix_size",
                            format!("must not exceed {}", config.max_matrix_size),
                        )
                    })?;
                SimulationPlan::Matrix(MatrixParams { size })
            }
            ComputationKind::NeuralNetwork => SimulationPlan::NeuralNetwork(NeuralNetworkParams {
                layers: read_echoed(parameters, "layers", DEFAULT_LAYERS),
                batch_size: read_echoed(parameters, "batch_size", DEFAULT_BATCH_SIZE),
            }),
            ComputationKind::ImageProcessing => {
                let width = read_u64(parameters, "width", DEFAULT_WIDTH)?;
                let height = read_u64(parameters, "height", DEFAULT_HEIGHT)?;
                let pixels = width.checked_mul(height).ok_or_else(|| {
                    ComputeError::invalid("width", "width * height overflows the pixel count")
                })?;
                SimulationPlan::Image(ImageParams {
                    width,
                    height,
                    pixels,
                })
            }
            ComputationKind::Default => SimulationPlan::Default(DefaultParams {
                iterations: read_u64(parameters, "iterations", DEFAULT_ITERATIONS)?,
            }),
        };
        Ok(plan)
    }

    pub fn kind(&self) -> ComputationKind {
        match self {
            SimulationPlan::Matrix(_) => ComputationKind::MatrixMultiplication,
            SimulationPlan::NeuralNetwork(_) => ComputationKind::NeuralNetwork,
            SimulationPlan::Image(_) => ComputationKind::ImageProcessing,
            SimulationPlan::Default(_) => ComputationKind::Default,
        }
    }
}

/// Read a non-negative integer, falling back to `default` when absent or null.
fn read_u64(parameters: &Parameters, name: &str, default: u64) -> Result<u64, ComputeError> {
    match parameters.get(name) {
        None | Some(Value::Null) => Ok(default),
        Some(value) => value.as_u64().ok_or_else(|| {
            ComputeError::invalid(name, format!("expected a non-negative integer, got {value}"))
        }),
    }
}

/// Read a value that is only echoed back; any JSON value is accepted.
fn read_echoed(parameters: &Parameters, name: &str, default: u64) -> Value {
    match parameters.get(name) {
        None | Some(Value::Null) => Value::from(default),
        Some(value) => value.clone(),
    }
}
