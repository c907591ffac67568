use reqwest::Client;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::repository::WorkflowExecutor;
use crate::error::FunctionsError;

/// Posts `{workflow_id, trigger: "schedule"}` to the automation runner.
#[derive(Clone)]
pub struct HttpWorkflowExecutor {
    pub client: Client,
    pub execute_url: String,
}

#[derive(Serialize)]
struct ExecuteRequest {
    workflow_id: Uuid,
    trigger: &'static str,
}

impl WorkflowExecutor for HttpWorkflowExecutor {
    async fn execute(&self, workflow_id: Uuid) -> Result<(), FunctionsError> {
        let response = self
            .client
            .post(&self.execute_url)
            .json(&ExecuteRequest {
                workflow_id,
                trigger: "schedule",
            })
            .send()
            .await
            .map_err(|e| FunctionsError::Upstream(format!("executor unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FunctionsError::Upstream(format!(
                "executor returned {status}"
            )));
        }
        Ok(())
    }
}
