//! Simulation routines, one per computation kind.
//!
//! CPU-bound work runs on tokio's blocking pool; pure waits use
//! `tokio::time::sleep` so concurrent requests overlap their delays.

pub mod default;
pub mod image;
pub mod matrix;
pub mod neural;

pub use default::DefaultComputation;
pub use image::ImageProcessing;
pub use matrix::MatrixMultiplication;
pub use neural::NeuralNetworkInference;

use crate::ComputeError;

/// Run CPU-bound work off the async workers.
pub(crate) async fn run_blocking<F, T>(work: F) -> Result<T, ComputeError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ComputeError::TaskFailed(e.to_string()))
}

/// Round to a fixed number of decimal places.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
