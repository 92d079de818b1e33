//! Domain layer: computation kinds, typed parameters, request/result types.

pub mod kind;
pub mod params;
pub mod types;
