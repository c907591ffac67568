use serde::Deserialize;

use crm_core::config::Config;

/// Functions service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct FunctionsConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// HS256 secret shared with the auth provider. Env var: `JWT_SECRET`.
    pub jwt_secret: String,
    /// TCP port for the HTTP server (default 3100). Env var: `FUNCTIONS_PORT`.
    #[serde(default = "default_functions_port")]
    pub functions_port: u16,
    /// Base URL of an OpenAI-compatible gateway. Env var: `LLM_GATEWAY_URL`.
    pub llm_gateway_url: String,
    /// Bearer key for the gateway. Env var: `LLM_API_KEY`.
    pub llm_api_key: String,
    /// Env var: `LLM_MODEL`.
    #[serde(default = "default_llm_model")]
    pub llm_model: String,
    /// Endpoint that runs a workflow. Env var: `AUTOMATION_EXECUTE_URL`.
    pub automation_execute_url: String,
    /// IP geolocation endpoint; the address is appended as a path segment.
    /// Env var: `GEO_LOOKUP_URL`.
    #[serde(default = "default_geo_lookup_url")]
    pub geo_lookup_url: String,
    /// ISO country codes refused by `/geo-check`, comma separated.
    /// Env var: `BLOCKED_COUNTRIES`.
    #[serde(default)]
    pub blocked_countries: Vec<String>,
    /// Probability in `[0, 1]` that a regular card is declined.
    /// Env var: `PAYMENT_DECLINE_RATE`.
    #[serde(default)]
    pub payment_decline_rate: f64,
    /// Background schedule poll period; `0` disables the loop.
    /// Env var: `SCHEDULE_POLL_SECS`.
    #[serde(default = "default_schedule_poll_secs")]
    pub schedule_poll_secs: u64,
}

fn default_functions_port() -> u16 {
    3100
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_owned()
}

fn default_geo_lookup_url() -> String {
    "http://ip-api.com/json".to_owned()
}

fn default_schedule_poll_secs() -> u64 {
    300
}

impl FunctionsConfig {
    /// Block list normalised to upper case with blanks dropped.
    pub fn blocked_countries(&self) -> Vec<String> {
        self.blocked_countries
            .iter()
            .map(|c| c.trim().to_ascii_uppercase())
            .filter(|c| !c.is_empty())
            .collect()
    }
}

impl Config for FunctionsConfig {}
