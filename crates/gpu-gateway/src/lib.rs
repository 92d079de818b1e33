//! GPU gateway - HTTP interface for the simulated GPU compute engine.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        GPU GATEWAY                           │
//! ├──────────────────────────────────────────────────────────────┤
//! │  CatchPanic → Tracing → CORS → BodyLimit                     │
//! │         │                                                    │
//! │   ┌─────┴──────────┐         ┌──────────────────────────┐    │
//! │   │  Public routes │         │  Protected routes        │    │
//! │   │  GET /         │         │  (Auth route layer)      │    │
//! │   │  GET /health   │         │  GET  /gpu-status        │    │
//! │   └────────────────┘         │  POST /compute           │    │
//! │                              │  POST /batch-compute     │    │
//! │                              └────────────┬─────────────┘    │
//! └───────────────────────────────────────────┼──────────────────┘
//!                                             ▼
//!                                   gpu_compute::ComputeEngine
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use gpu_gateway::{GpuService, ServiceConfig};
//!
//! let config = ServiceConfig::from_env()?;
//! let service = GpuService::new(config)?;
//! service.start().await?;
//! ```
//!
//! # Security
//!
//! - Bearer token on every protected route, compared in constant time
//! - Request size and batch limits
//! - Panic messages only exposed in development

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod domain;
pub mod handlers;
pub mod middleware;
pub mod service;
pub mod telemetry;

// Re-exports for public API
pub use domain::config::{ConfigError, ServiceConfig};
pub use domain::error::{ApiError, ApiResult, GatewayError};
pub use domain::types::*;
pub use service::{build_router, AppState, GpuService, ShutdownHandle};
pub use telemetry::init_logging;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
