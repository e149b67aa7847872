//! Core library for the solar installation maintenance tracker: the
//! installation record model, the service-scheduling engine, validation,
//! query building, portfolio statistics, and the HTTP surface over them.

pub mod config;
pub mod error;
pub mod fleet;
pub mod telemetry;
