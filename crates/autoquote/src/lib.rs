//! Validation and intake core for multi-step auto-insurance applications.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
