pub mod auth;
pub mod dashboard;
pub mod extract;
pub mod health;
pub mod me;
pub mod record;
