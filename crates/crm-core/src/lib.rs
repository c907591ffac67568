//! Shared HTTP plumbing for CRM services.

pub mod config;
pub mod cors;
pub mod error;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
