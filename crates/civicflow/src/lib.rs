//! Clearance workflow engine backing the municipal e-services portal.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
