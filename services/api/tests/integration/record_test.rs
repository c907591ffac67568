use serde_json::json;
use uuid::Uuid;

use crm_api::domain::types::ListFilter;
use crm_api::error::ApiError;
use crm_api::usecase::record::{
    CreateRecordUseCase, DeleteRecordUseCase, GetRecordUseCase, ListRecordsUseCase,
    UpdateRecordUseCase,
};
use crm_domain::entity::{self, LEADS, USERS};
use crm_domain::id::CompanyId;
use crm_domain::tenant::TenantScope;
use crm_testing::memory::MemoryRowStore;

use crate::helpers::{record_repo, row};

// ── ListRecords ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_never_list_rows_of_another_tenant() {
    let store = MemoryRowStore::new();
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    store.seed("leads", json!({"company_id": a.to_string(), "name": "a1"}));
    store.seed("leads", json!({"company_id": b.to_string(), "name": "b1"}));
    store.seed("leads", json!({"company_id": a.to_string(), "name": "a2"}));

    let uc = ListRecordsUseCase {
        repo: record_repo(&store),
    };
    let rows = uc
        .execute(&LEADS, TenantScope::Company(CompanyId(a)), None)
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r["company_id"] == a.to_string()));
}

#[tokio::test]
async fn should_list_newest_first_with_filter() {
    let store = MemoryRowStore::new();
    let company = Uuid::new_v4().to_string();
    store.seed(
        "leads",
        json!({"company_id": company, "status": "new", "created_at": "2024-01-01T00:00:00Z"}),
    );
    store.seed(
        "leads",
        json!({"company_id": company, "status": "won", "created_at": "2024-02-01T00:00:00Z"}),
    );
    store.seed(
        "leads",
        json!({"company_id": company, "status": "new", "created_at": "2024-03-01T00:00:00Z"}),
    );

    let uc = ListRecordsUseCase {
        repo: record_repo(&store),
    };
    let filter = ListFilter {
        column: "status",
        value: json!("new"),
    };
    let rows = uc
        .execute(
            &LEADS,
            TenantScope::Company(company.parse().unwrap()),
            Some(filter),
        )
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["created_at"], "2024-03-01T00:00:00Z");
    assert_eq!(rows[1]["created_at"], "2024-01-01T00:00:00Z");
}

#[tokio::test]
async fn should_propagate_store_errors_from_list() {
    let store = MemoryRowStore::new();
    store.fail_table("leads");
    let uc = ListRecordsUseCase {
        repo: record_repo(&store),
    };
    let result = uc.execute(&LEADS, TenantScope::All, None).await;
    assert!(matches!(result, Err(ApiError::Internal(_))));
}

// ── GetRecord / UpdateRecord ─────────────────────────────────────────────────

#[tokio::test]
async fn should_get_record_of_any_tenant() {
    let store = MemoryRowStore::new();
    let id = store.seed(
        "leads",
        json!({"company_id": Uuid::new_v4().to_string(), "name": "x"}),
    );
    let uc = GetRecordUseCase {
        repo: record_repo(&store),
    };
    let row = uc.execute(&LEADS, id).await.unwrap();
    assert_eq!(row["name"], "x");
}

#[tokio::test]
async fn should_return_not_found_for_missing_record() {
    let store = MemoryRowStore::new();
    let uc = GetRecordUseCase {
        repo: record_repo(&store),
    };
    let result = uc.execute(&LEADS, Uuid::new_v4()).await;
    assert!(matches!(result, Err(ApiError::RecordNotFound)));

    let uc = UpdateRecordUseCase {
        repo: record_repo(&store),
    };
    let result = uc
        .execute(&LEADS, Uuid::new_v4(), row(json!({"name": "y"})))
        .await;
    assert!(matches!(result, Err(ApiError::RecordNotFound)));
}

#[tokio::test]
async fn should_update_and_return_row() {
    let store = MemoryRowStore::new();
    let id = store.seed("leads", json!({"name": "x", "status": "new"}));
    let uc = UpdateRecordUseCase {
        repo: record_repo(&store),
    };
    let updated = uc
        .execute(&LEADS, id, row(json!({"status": "qualified"})))
        .await
        .unwrap();
    assert_eq!(updated["status"], "qualified");
    assert_eq!(updated["name"], "x");
}

// ── CreateRecord ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_insert_and_return_created_row() {
    let store = MemoryRowStore::new();
    let uc = CreateRecordUseCase {
        repo: record_repo(&store),
    };
    let created = uc
        .execute(&LEADS, row(json!({"name": "Ada"})))
        .await
        .unwrap();
    let id: Uuid = created["id"].as_str().unwrap().parse().unwrap();
    assert_eq!(store.get("leads", id).unwrap()["name"], "Ada");
}

#[tokio::test]
async fn should_reject_empty_payload() {
    let store = MemoryRowStore::new();
    let uc = CreateRecordUseCase {
        repo: record_repo(&store),
    };
    let result = uc.execute(&LEADS, row(json!({}))).await;
    assert!(matches!(result, Err(ApiError::InvalidPayload(_))));
}

// ── DeleteRecord ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_hard_delete_regular_entities() {
    let store = MemoryRowStore::new();
    let id = store.seed("leads", json!({"name": "x"}));
    let uc = DeleteRecordUseCase {
        repo: record_repo(&store),
    };
    let message = uc.execute(&LEADS, id).await.unwrap();
    assert_eq!(message, "Lead deleted successfully");
    assert!(store.get("leads", id).is_none());
}

#[tokio::test]
async fn should_soft_delete_users_and_branches() {
    let store = MemoryRowStore::new();
    let user = store.seed("users", json!({"status": "active"}));
    let branch = store.seed("branches", json!({"is_active": true}));
    let uc = DeleteRecordUseCase {
        repo: record_repo(&store),
    };

    assert_eq!(
        uc.execute(&USERS, user).await.unwrap(),
        "User deleted successfully"
    );
    assert_eq!(store.get("users", user).unwrap()["status"], "inactive");

    let branches = entity::find("branches").unwrap();
    uc.execute(branches, branch).await.unwrap();
    assert_eq!(store.get("branches", branch).unwrap()["is_active"], false);
}

#[tokio::test]
async fn should_confirm_delete_of_missing_row() {
    let store = MemoryRowStore::new();
    let uc = DeleteRecordUseCase {
        repo: record_repo(&store),
    };
    let message = uc.execute(&LEADS, Uuid::new_v4()).await.unwrap();
    assert_eq!(message, "Lead deleted successfully");
}
