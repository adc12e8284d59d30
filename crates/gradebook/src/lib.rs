//! Course grade projection: a pure aggregation engine plus the service,
//! import, and HTTP plumbing around it.

pub mod config;
pub mod courses;
pub mod engine;
pub mod error;
pub mod telemetry;
