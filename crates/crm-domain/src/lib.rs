//! Domain types shared across all CRM services.
//!
//! This crate contains only pure types and pure decision logic with no
//! framework dependencies. Import in `usecase/` and `domain/` layers.

pub mod entity;
pub mod id;
pub mod permission;
pub mod schedule;
pub mod tenant;
pub mod user;
