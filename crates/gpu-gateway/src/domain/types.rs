//! Response bodies for the HTTP routes.
//!
//! Every body carries a `timestamp` produced by [`utc_timestamp`] at the
//! moment the response is built.

use gpu_compute::{utc_timestamp, BatchReport, ComputationResult, StatusSnapshot};
use serde::Serialize;

/// Name reported by `GET /`
pub const SERVICE_NAME: &str = "GPU Compute Service";

/// `GET /`
#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub timestamp: String,
}

impl ServiceInfo {
    pub fn running() -> Self {
        Self {
            service: SERVICE_NAME,
            version: crate::VERSION,
            status: "running",
            timestamp: utc_timestamp(),
        }
    }
}

/// `GET /health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub version: &'static str,
    pub gpu_available: bool,
}

impl HealthResponse {
    pub fn healthy(gpu_available: bool) -> Self {
        Self {
            status: "healthy",
            timestamp: utc_timestamp(),
            version: crate::VERSION,
            gpu_available,
        }
    }
}

/// `GET /gpu-status`
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub gpu_info: StatusSnapshot,
    pub timestamp: String,
}

impl StatusResponse {
    pub fn new(gpu_info: StatusSnapshot) -> Self {
        Self {
            status: "success",
            gpu_info,
            timestamp: utc_timestamp(),
        }
    }
}

/// `POST /compute`
#[derive(Debug, Clone, Serialize)]
pub struct ComputeResponse {
    pub status: &'static str,
    pub computation: ComputationResult,
    pub priority: String,
    pub client_ip: String,
    pub timestamp: String,
}

impl ComputeResponse {
    pub fn new(computation: ComputationResult, priority: String, client_ip: String) -> Self {
        Self {
            status: "success",
            computation,
            priority,
            client_ip,
            timestamp: utc_timestamp(),
        }
    }
}

/// `POST /batch-compute`
#[derive(Debug, Clone, Serialize)]
pub struct BatchComputeResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub report: BatchReport,
    pub client_ip: String,
    pub timestamp: String,
}

impl BatchComputeResponse {
    pub fn new(report: BatchReport, client_ip: String) -> Self {
        Self {
            status: "completed",
            report,
            client_ip,
            timestamp: utc_timestamp(),
        }
    }
}

/// Body rendered when a handler panics
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    /// Panic message, only in development
    pub details: Option<String>,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn internal(details: Option<String>) -> Self {
        Self {
            error: "Internal server error",
            details,
            timestamp: utc_timestamp(),
        }
    }
}
