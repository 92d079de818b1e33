//! Request, result envelope, status and batch types.

use super::params::Parameters;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Default request priority (advisory only)
pub const DEFAULT_PRIORITY: &str = "normal";

/// Current UTC time as an ISO-8601 string with microsecond precision
pub fn utc_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

// ═══════════════════════════════════════════════════════════════════════════
// REQUEST
// ═══════════════════════════════════════════════════════════════════════════

/// A single computation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputationRequest {
    /// Opaque input echoed back in the result
    pub data: String,
    /// Kind selection (`type`) and per-kind knobs
    #[serde(default, deserialize_with = "null_as_default")]
    pub parameters: Parameters,
    /// Advisory; never affects behavior
    #[serde(default = "default_priority", deserialize_with = "null_as_priority")]
    pub priority: String,
}

impl ComputationRequest {
    pub fn new(data: impl Into<String>, parameters: Parameters) -> Self {
        Self {
            data: data.into(),
            parameters,
            priority: default_priority(),
        }
    }
}

fn default_priority() -> String {
    DEFAULT_PRIORITY.to_string()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_priority<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_priority))
}

// ═══════════════════════════════════════════════════════════════════════════
// SIMULATION OUTPUTS
// ═══════════════════════════════════════════════════════════════════════════

/// Matrix multiplication result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixOutput {
    pub operation: &'static str,
    pub input_data: String,
    /// `"NxN"`
    pub matrix_size: String,
    pub result_shape: [usize; 2],
    pub result_sum: f64,
    /// `None` for an empty (0x0) product
    pub result_mean: Option<f64>,
    pub flops: u64,
}

/// Neural network inference result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeuralNetworkOutput {
    pub operation: &'static str,
    pub input_data: String,
    /// Echoed from the request as given
    pub layers: serde_json::Value,
    pub batch_size: serde_json::Value,
    pub predicted_class: u8,
    pub confidence: f64,
    pub inference_time_ms: f64,
}

/// Image processing result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageOutput {
    pub operation: &'static str,
    pub input_data: String,
    /// `"WxH"`
    pub image_dimensions: String,
    pub pixels_processed: u64,
    pub filters_applied: Vec<&'static str>,
    pub processing_time_ms: f64,
}

/// Default computation result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DefaultOutput {
    pub operation: &'static str,
    pub input_data: String,
    /// Requested count, not the executed one
    pub iterations: u64,
    pub computed_result: f64,
    pub data_length: usize,
    pub random_number: u32,
}

/// Result payload of any routine. Serializes as a flat map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SimulationOutput {
    Matrix(MatrixOutput),
    NeuralNetwork(NeuralNetworkOutput),
    Image(ImageOutput),
    Default(DefaultOutput),
}

impl SimulationOutput {
    /// The `operation` field of the payload
    pub fn operation(&self) -> &'static str {
        match self {
            SimulationOutput::Matrix(o) => o.operation,
            SimulationOutput::NeuralNetwork(o) => o.operation,
            SimulationOutput::Image(o) => o.operation,
            SimulationOutput::Default(o) => o.operation,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// ENVELOPE
// ═══════════════════════════════════════════════════════════════════════════

/// Outcome of one `run`: exactly one of a payload or an error description
#[derive(Debug, Clone, PartialEq)]
pub enum ComputationOutcome {
    Success(SimulationOutput),
    Failure(String),
}

/// Uniform result envelope returned by every computation
#[derive(Debug, Clone, PartialEq)]
pub struct ComputationResult {
    pub outcome: ComputationOutcome,
    /// Wall-clock seconds from entry to return
    pub computation_time: f64,
    pub timestamp: String,
    pub request_id: Uuid,
}

impl ComputationResult {
    /// Stamp an outcome with the current time
    pub fn new(request_id: Uuid, outcome: ComputationOutcome, computation_time: f64) -> Self {
        Self {
            outcome,
            computation_time,
            timestamp: utc_timestamp(),
            request_id,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ComputationOutcome::Success(_))
    }

    /// Mirrors `is_success`
    pub fn gpu_used(&self) -> bool {
        self.is_success()
    }

    pub fn result(&self) -> Option<&SimulationOutput> {
        match &self.outcome {
            ComputationOutcome::Success(output) => Some(output),
            ComputationOutcome::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            ComputationOutcome::Success(_) => None,
            ComputationOutcome::Failure(error) => Some(error),
        }
    }
}

impl Serialize for ComputationResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("ComputationResult", 6)?;
        state.serialize_field("success", &self.is_success())?;
        match &self.outcome {
            ComputationOutcome::Success(output) => state.serialize_field("result", output)?,
            ComputationOutcome::Failure(error) => state.serialize_field("error", error)?,
        }
        state.serialize_field("computation_time", &self.computation_time)?;
        state.serialize_field("timestamp", &self.timestamp)?;
        state.serialize_field("request_id", &self.request_id)?;
        state.serialize_field("gpu_used", &self.gpu_used())?;
        state.end()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// STATUS & BATCH
// ═══════════════════════════════════════════════════════════════════════════

/// Synthetic device health, freshly randomized on every call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSnapshot {
    pub gpu_available: bool,
    /// Whole seconds
    pub max_computation_time: u64,
    /// Seconds
    pub simulate_delay: f64,
    /// `"NN%"`
    pub gpu_memory_usage: String,
    /// `"NN°C"`
    pub gpu_temperature: String,
    pub active_processes: u32,
}

/// One entry of a batch run, tagged with its input position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchEntry {
    pub index: usize,
    /// Item ran to completion; see `result.success` for its outcome
    pub success: bool,
    pub result: ComputationResult,
}

/// Outcome of a sequential batch run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub total_requests: usize,
    pub successful: usize,
    pub failed: usize,
    pub results: Vec<BatchEntry>,
}

impl BatchReport {
    /// Tally the entries (they must already be in input order)
    pub fn from_entries(results: Vec<BatchEntry>) -> Self {
        let successful = results.iter().filter(|entry| entry.success).count();
        Self {
            total_requests: results.len(),
            successful,
            failed: results.len() - successful,
            results,
        }
    }
}
