pub mod auth;
pub mod dashboard;
pub mod permission;
pub mod record;
