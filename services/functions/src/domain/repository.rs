use std::future::Future;
use std::net::IpAddr;

use uuid::Uuid;

use crate::error::FunctionsError;

/// OpenAI-compatible chat completion.
pub trait LlmGateway: Send + Sync {
    /// Send one system and one user message; returns the first choice's content.
    fn complete(
        &self,
        system: &str,
        prompt: &str,
    ) -> impl Future<Output = Result<String, FunctionsError>> + Send;
}

/// Downstream endpoint that runs a workflow.
pub trait WorkflowExecutor: Send + Sync {
    fn execute(&self, workflow_id: Uuid) -> impl Future<Output = Result<(), FunctionsError>> + Send;
}

/// IP to ISO country code.
pub trait GeoLookup: Send + Sync {
    fn country(&self, ip: IpAddr) -> impl Future<Output = Result<String, FunctionsError>> + Send;
}
