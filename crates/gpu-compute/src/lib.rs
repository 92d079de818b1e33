//! # GPU-Compute: Simulated Computation Engine
//!
//! This crate is the core of the GPU compute service. No GPU is ever touched:
//! every "computation" is an artificial delay followed by fabricated numbers.
//!
//! ## Flow
//!
//! ```text
//! caller ──run(data, parameters)──→ ComputeEngine
//!                                        │  sleep(simulate_delay)
//!                                        │  ComputationKind::from_parameters
//!                                        │  SimulationPlan::extract  (typed params)
//!                                        ↓
//!                                   Dispatcher ──→ matrix | neural | image | default
//!                                        │
//!                                        ↓
//!                          ComputationResult (success XOR error)
//! ```
//!
//! ## Kinds
//!
//! | Kind | Extra latency | Work |
//! |------|---------------|------|
//! | `matrix_multiplication` | none | Real NxN product over random entries (rayon) |
//! | `neural_network` | 500ms | Sampled class / confidence |
//! | `image_processing` | 300ms | Fixed filter list, sampled timing |
//! | `default` | none | `sin(i)·cos(i)` sum, capped at 100 000 iterations |
//!
//! Unknown or missing `type` values always resolve to `default`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gpu_compute::{ComputeEngine, EngineConfig};
//!
//! let engine = ComputeEngine::new(EngineConfig::default());
//! let envelope = engine.run("hello", &parameters).await;
//! assert!(envelope.is_success());
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod dispatch;
pub mod domain;
pub mod engine;
pub mod tasks;

pub use config::EngineConfig;
pub use dispatch::Dispatcher;
pub use domain::kind::ComputationKind;
pub use domain::params::{
    DefaultParams, ImageParams, MatrixParams, NeuralNetworkParams, Parameters, SimulationPlan,
};
pub use domain::types::{
    utc_timestamp, BatchEntry, BatchReport, ComputationOutcome, ComputationRequest,
    ComputationResult, SimulationOutput, StatusSnapshot,
};
pub use engine::ComputeEngine;
pub use uuid::Uuid;

use thiserror::Error;

/// Compute engine errors.
///
/// These never escape [`ComputeEngine::run`]; they are rendered into the
/// failure side of the envelope.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComputeError {
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Compute task failed: {0}")]
    TaskFailed(String),
}

impl ComputeError {
    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        ComputeError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// A simulation routine - implemented once per [`ComputationKind`].
///
/// Each routine receives its own typed parameter record, already extracted
/// and defaulted by [`SimulationPlan::extract`].
#[async_trait::async_trait]
pub trait Simulation: Send + Sync {
    /// Typed parameters for this routine
    type Params: Send + 'static;
    /// Result payload
    type Output: Send;

    /// Kind served by this routine
    fn kind(&self) -> ComputationKind;

    /// Produce a fabricated result for `data`
    async fn simulate(&self, data: &str, params: Self::Params)
        -> Result<Self::Output, ComputeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_message() {
        let err = ComputeError::invalid("matrix_size", "expected a non-negative integer");
        assert_eq!(
            err.to_string(),
            "invalid parameter 'matrix_size': expected a non-negative integer"
        );
    }

    #[test]
    fn test_task_failed_message() {
        let err = ComputeError::TaskFailed("worker panicked".into());
        assert!(err.to_string().contains("worker panicked"));
    }
}
