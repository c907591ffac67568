use std::time::Duration;

pub mod executor;
pub mod geo;
pub mod llm;

/// Outbound calls give up after this long.
pub const OUTBOUND_TIMEOUT: Duration = Duration::from_secs(15);

/// Shared client for every outbound integration.
pub fn http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder().timeout(OUTBOUND_TIMEOUT).build()
}
