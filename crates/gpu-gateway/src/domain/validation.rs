//! Request validation applied before anything reaches the engine.

use crate::domain::config::LimitsConfig;
use crate::domain::error::ApiError;
use gpu_compute::ComputationRequest;

/// Check a single `/compute` request.
///
/// Data length is measured in characters, not bytes.
pub fn validate_compute(request: &ComputationRequest, limits: &LimitsConfig) -> Result<(), ApiError> {
    if request.data.is_empty() {
        return Err(ApiError::bad_request("No data provided for computation"));
    }

    if request.data.chars().count() > limits.max_data_chars {
        return Err(ApiError::bad_request(format!(
            "Input data too large (max {}KB)",
            limits.max_data_chars / 1000
        )));
    }

    Ok(())
}

/// Check a `/batch-compute` body. Items themselves are not validated.
pub fn validate_batch(requests: &[ComputationRequest], limits: &LimitsConfig) -> Result<(), ApiError> {
    if requests.len() > limits.max_batch_size {
        return Err(ApiError::bad_request(format!(
            "Batch size too large (max {} requests)",
            limits.max_batch_size
        )));
    }

    Ok(())
}
