//! Middleware stack for the GPU gateway.
//!
//! Layer order (outermost first): CatchPanic → Tracing → CORS → BodyLimit →
//! Handler. Protected routes additionally run Auth as a route layer.

pub mod auth;
pub mod client_ip;
pub mod cors;
pub mod tracing;

pub use auth::{constant_time_compare, AuthConfig, AuthLayer};
pub use client_ip::ClientIp;
pub use cors::create_cors_layer;
pub use tracing::TracingLayer;
