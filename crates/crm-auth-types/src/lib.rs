//! Auth types shared across CRM services.
//!
//! Provides bearer JWT validation and the per-request `Identity`.

pub mod identity;
pub mod token;
