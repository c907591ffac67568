pub mod ai;
pub mod auth;
pub mod extract;
pub mod geo;
pub mod health;
pub mod payment;
pub mod schedule;
pub mod tracking;
