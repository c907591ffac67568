use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Value, json};
use uuid::Uuid;

use crm_functions::domain::types::{Outcome, ScheduleSummary};
use crm_functions::error::FunctionsError;
use crm_functions::poller::SchedulePoller;
use crm_functions::usecase::schedule::ScheduleAutomationUseCase;
use crm_testing::memory::MemoryRowStore;

use crate::helpers::MockExecutor;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 3, 9, 2, 0).unwrap()
}

fn workflow(store: &MemoryRowStore, schedule: &str, time: &str, extra: Value) -> Uuid {
    let mut row = json!({
        "name": format!("{schedule} at {time}"),
        "is_active": true,
        "trigger_type": "schedule",
        "trigger_config": {"schedule": schedule, "time": time},
        "last_triggered_at": null,
    });
    if let (Value::Object(row), Value::Object(extra)) = (&mut row, extra) {
        row.extend(extra);
    }
    store.seed("workflows", row)
}

fn outcome_of(summary: &ScheduleSummary, id: Uuid) -> Outcome {
    summary
        .results
        .iter()
        .find(|r| r.workflow_id == id)
        .map(|r| r.outcome.clone())
        .unwrap()
}

#[tokio::test]
async fn should_fire_due_workflows_and_skip_the_rest() {
    let store = MemoryRowStore::new();
    let due = workflow(&store, "daily", "09:00", json!({}));
    let later = workflow(&store, "daily", "17:30", json!({}));
    let recent = workflow(
        &store,
        "daily",
        "09:00",
        json!({"last_triggered_at": "2024-06-02T10:00:00Z"}),
    );
    let inactive = workflow(&store, "daily", "09:00", json!({"is_active": false}));
    let manual = workflow(&store, "daily", "09:00", json!({"trigger_type": "lead_created"}));
    let executor = MockExecutor::default();
    let uc = ScheduleAutomationUseCase {
        store: store.clone(),
        executor: executor.clone(),
    };

    let summary = uc.execute(now()).await.unwrap();

    assert_eq!(summary.checked, 3);
    assert_eq!(summary.fired, 1);
    assert_eq!(summary.skipped, 2);
    assert_eq!(outcome_of(&summary, due), Outcome::Fired);
    assert_eq!(outcome_of(&summary, later), Outcome::Skipped);
    assert_eq!(outcome_of(&summary, recent), Outcome::Skipped);
    assert_eq!(executor.calls(), vec![due]);
    assert_eq!(
        store.get("workflows", due).unwrap()["last_triggered_at"],
        "2024-06-03T09:02:00.000Z"
    );
    for untouched in [later, inactive, manual] {
        assert!(store.get("workflows", untouched).unwrap()["last_triggered_at"].is_null());
    }
}

#[tokio::test]
async fn should_keep_firing_after_one_workflow_fails() {
    let store = MemoryRowStore::new();
    let broken = workflow(&store, "daily", "09:00", json!({}));
    let healthy = workflow(&store, "hourly", "00:00", json!({}));
    let malformed = workflow(&store, "fortnightly", "09:00", json!({}));
    let executor = MockExecutor::failing_for(&[broken]);
    let uc = ScheduleAutomationUseCase {
        store: store.clone(),
        executor: executor.clone(),
    };

    let summary = uc.execute(now()).await.unwrap();

    assert_eq!((summary.fired, summary.failed), (1, 2));
    assert_eq!(outcome_of(&summary, healthy), Outcome::Fired);
    assert!(matches!(outcome_of(&summary, broken), Outcome::Failed { .. }));
    let Outcome::Failed { reason } = outcome_of(&summary, malformed) else {
        panic!("malformed config should fail");
    };
    assert!(reason.contains("fortnightly"));
    assert!(store.get("workflows", broken).unwrap()["last_triggered_at"].is_null());
    assert_eq!(executor.calls().len(), 2);
}

#[tokio::test]
async fn should_fail_the_pass_when_workflows_cannot_be_listed() {
    let store = MemoryRowStore::new();
    store.fail_table("workflows");
    let uc = ScheduleAutomationUseCase {
        store,
        executor: MockExecutor::default(),
    };
    assert!(matches!(
        uc.execute(now()).await,
        Err(FunctionsError::Internal(_))
    ));
}

#[tokio::test]
async fn should_serialize_summary_with_flat_outcomes() {
    let store = MemoryRowStore::new();
    let id = workflow(&store, "weekly", "nine", json!({}));
    let uc = ScheduleAutomationUseCase {
        store,
        executor: MockExecutor::default(),
    };

    let summary = serde_json::to_value(uc.execute(now()).await.unwrap()).unwrap();

    assert_eq!(summary["ran_at"], "2024-06-03T09:02:00.000Z");
    assert_eq!(summary["failed"], 1);
    assert_eq!(summary["results"][0]["workflow_id"], id.to_string());
    assert_eq!(summary["results"][0]["status"], "failed");
    assert_eq!(summary["results"][0]["reason"], "invalid time: nine");
}

#[tokio::test]
async fn should_fire_from_background_poller() {
    let store = MemoryRowStore::new();
    let time = Utc::now().format("%H:%M").to_string();
    let id = workflow(&store, "daily", &time, json!({}));
    let executor = MockExecutor::default();

    let handle = SchedulePoller::spawn(
        store.clone(),
        executor.clone(),
        Duration::from_millis(20),
    );
    tokio::time::sleep(Duration::from_millis(150)).await;
    handle.abort();

    assert_eq!(executor.calls(), vec![id]);
    assert!(store.get("workflows", id).unwrap()["last_triggered_at"].is_string());
}
