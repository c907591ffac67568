use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use uuid::Uuid;

use crm_core::serde::format_rfc3339_ms;
use crm_domain::entity::WORKFLOWS;
use crm_domain::schedule::Schedule;
use crm_store::{Row, RowStore, Select};

use crate::domain::repository::WorkflowExecutor;
use crate::domain::types::{Outcome, ScheduleSummary};
use crate::error::FunctionsError;

pub const SCHEDULE_TRIGGER: &str = "schedule";

/// Whether the workflow `row` should fire at `now`.
///
/// `trigger_config` may be a JSON object or a string holding one.
pub fn is_due(row: &Row, now: DateTime<Utc>) -> Result<bool, String> {
    let config = match row.get("trigger_config") {
        Some(Value::String(raw)) => {
            serde_json::from_str(raw).map_err(|e| format!("trigger_config is not JSON: {e}"))?
        }
        Some(other) => other.clone(),
        None => Value::Null,
    };
    let field = |name: &str| {
        config
            .get(name)
            .and_then(Value::as_str)
            .ok_or_else(|| format!("trigger_config.{name} is missing"))
    };
    let schedule = Schedule::parse(field("schedule")?, field("time")?).map_err(|e| e.to_string())?;

    let last_triggered = match row.get("last_triggered_at") {
        None | Some(Value::Null) => None,
        Some(Value::String(raw)) => Some(
            DateTime::parse_from_rfc3339(raw)
                .map_err(|e| format!("last_triggered_at is not RFC 3339: {e}"))?
                .with_timezone(&Utc),
        ),
        Some(other) => return Err(format!("last_triggered_at has unexpected value {other}")),
    };

    Ok(schedule.is_due(now, last_triggered))
}

/// One dispatch pass over active schedule-triggered workflows.
///
/// Workflows are handled one at a time; a failure is recorded against that
/// workflow and the pass moves on.
pub struct ScheduleAutomationUseCase<S: RowStore, W: WorkflowExecutor> {
    pub store: S,
    pub executor: W,
}

impl<S: RowStore, W: WorkflowExecutor> ScheduleAutomationUseCase<S, W> {
    pub async fn execute(&self, now: DateTime<Utc>) -> Result<ScheduleSummary, FunctionsError> {
        let query = Select::table(WORKFLOWS.table)
            .eq("is_active", true)
            .eq("trigger_type", SCHEDULE_TRIGGER);
        let workflows = self.store.select(&query).await?;

        let mut summary = ScheduleSummary::new(now);
        for row in &workflows {
            let Some(workflow_id) = row
                .get("id")
                .and_then(Value::as_str)
                .and_then(|id| id.parse::<Uuid>().ok())
            else {
                tracing::warn!("scheduled workflow without a usable id");
                continue;
            };
            let outcome = self.dispatch(workflow_id, row, now).await;
            if let Outcome::Failed { reason } = &outcome {
                tracing::warn!(%workflow_id, %reason, "scheduled workflow failed");
            }
            summary.record(workflow_id, outcome);
        }

        tracing::info!(
            checked = summary.checked,
            fired = summary.fired,
            failed = summary.failed,
            "schedule pass complete"
        );
        Ok(summary)
    }

    async fn dispatch(&self, workflow_id: Uuid, row: &Row, now: DateTime<Utc>) -> Outcome {
        match is_due(row, now) {
            Ok(true) => {}
            Ok(false) => return Outcome::Skipped,
            Err(reason) => return Outcome::Failed { reason },
        }

        if let Err(e) = self.executor.execute(workflow_id).await {
            return Outcome::Failed {
                reason: e.to_string(),
            };
        }

        let mut patch = Row::new();
        patch.insert(
            "last_triggered_at".into(),
            json!(format_rfc3339_ms(&now)),
        );
        match self.store.update(WORKFLOWS.table, workflow_id, patch).await {
            Ok(_) => {
                tracing::info!(%workflow_id, "scheduled workflow fired");
                Outcome::Fired
            }
            Err(e) => Outcome::Failed {
                reason: format!("fired but last_triggered_at not stamped: {e}"),
            },
        }
    }
}
