//! Test utilities for the CRM services.
//!
//! Provides `MemoryRowStore`, an in-process row store, and `MockAuth` for
//! minting bearer tokens. Use from `[dev-dependencies]` only.

pub mod auth;
pub mod memory;
