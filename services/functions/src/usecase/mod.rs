pub mod auth;
pub mod forecast;
pub mod geo;
pub mod payment;
pub mod schedule;
pub mod scoring;
pub mod tracking;
