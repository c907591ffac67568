use axum::body::Bytes;
use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};
use uuid::Uuid;

use crm_domain::user::UserRole;
use crm_testing::auth::MockAuth;
use crm_testing::memory::MemoryRowStore;

use crate::helpers::test_server;

fn caller(store: &MemoryRowStore, role: UserRole) -> MockAuth {
    let auth = MockAuth::new(role, Some(Uuid::new_v4()));
    auth.seed(store);
    auth
}

// ── Health ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_answer_health_checks_without_auth() {
    let server = test_server(&MemoryRowStore::new());
    assert_eq!(server.get("/healthz").await.status_code(), StatusCode::OK);
    assert_eq!(server.get("/readyz").await.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn should_tag_responses_with_request_id() {
    let server = test_server(&MemoryRowStore::new());
    let response = server.get("/healthz").await;
    let id = response.header("x-request-id");
    assert!(id.to_str().unwrap().parse::<Uuid>().is_ok());
}

// ── Authentication ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_missing_and_invalid_tokens_uniformly() {
    let store = MemoryRowStore::new();
    let inactive = MockAuth::new(UserRole::Admin, Some(Uuid::new_v4()));
    inactive.seed_with_status(&store, "inactive");
    let server = test_server(&store);

    let missing = server.get("/leads").await;
    let garbage = server.get("/leads").authorization_bearer("garbage").await;
    let deactivated = server
        .get("/leads")
        .authorization_bearer(inactive.token())
        .await;

    for response in [missing, garbage, deactivated] {
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
        let body = response.json::<Value>();
        assert_eq!(
            body,
            json!({"kind": "UNAUTHORIZED", "message": "unauthorized"})
        );
    }
}

#[tokio::test]
async fn should_return_identity_from_me() {
    let store = MemoryRowStore::new();
    let auth = caller(&store, UserRole::Manager);
    let server = test_server(&store);

    let body = server
        .get("/me")
        .authorization_bearer(auth.token())
        .await
        .json::<Value>();

    assert_eq!(body["id"], auth.user_id.to_string());
    assert_eq!(body["role"], "manager");
    assert_eq!(body["company_id"], auth.company_id.unwrap().to_string());
}

// ── Permissions ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_granted_permissions() {
    let store = MemoryRowStore::new();
    let auth = caller(&store, UserRole::User);
    let server = test_server(&store);

    let body = server
        .get("/me/permissions")
        .authorization_bearer(auth.token())
        .await
        .json::<Vec<String>>();

    assert!(body.contains(&"leads.read".to_owned()));
    assert!(!body.contains(&"leads.delete".to_owned()));
    assert!(!body.contains(&"users.manage".to_owned()));
    let mut sorted = body.clone();
    sorted.sort();
    assert_eq!(body, sorted);
}

async fn check(server: &TestServer, auth: &MockAuth, body: Value) -> Value {
    server
        .post("/me/permissions/check")
        .authorization_bearer(auth.token())
        .json(&body)
        .await
        .json::<Value>()["allowed"]
        .clone()
}

#[tokio::test]
async fn should_evaluate_permission_checks() {
    let store = MemoryRowStore::new();
    let auth = caller(&store, UserRole::Manager);
    let server = test_server(&store);

    let cases = [
        (json!({}), true),
        (json!({"permission": "deals.delete"}), true),
        (json!({"permission": "users.manage"}), false),
        (json!({"permissions": ["users.manage", "leads.read"]}), true),
        (
            json!({"permissions": ["users.manage", "leads.read"], "require_all": true}),
            false,
        ),
    ];
    for (body, expected) in cases {
        let allowed = check(&server, &auth, body.clone()).await;
        assert_eq!(allowed, json!(expected), "{body}");
    }
}

// ── CRUD ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_return_unknown_entity_for_unregistered_segment() {
    let store = MemoryRowStore::new();
    let auth = caller(&store, UserRole::Admin);
    let server = test_server(&store);

    let response = server
        .get("/spaceships")
        .authorization_bearer(auth.token())
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["kind"], "UNKNOWN_ENTITY");
}

#[tokio::test]
async fn should_create_into_callers_tenant_and_list_it_back() {
    let store = MemoryRowStore::new();
    let auth = caller(&store, UserRole::User);
    let other = caller(&store, UserRole::User);
    let server = test_server(&store);

    let created = server
        .post("/leads")
        .authorization_bearer(auth.token())
        .json(&json!({"name": "Ada", "status": "new", "company_id": "spoofed"}))
        .await;
    assert_eq!(created.status_code(), StatusCode::OK);
    let created = created.json::<Value>();
    assert_eq!(created["company_id"], auth.company_id.unwrap().to_string());
    assert_eq!(created["created_by"], auth.user_id.to_string());

    let mine = server
        .get("/leads?status=new")
        .authorization_bearer(auth.token())
        .await
        .json::<Vec<Value>>();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["name"], "Ada");

    let theirs = server
        .get("/leads")
        .authorization_bearer(other.token())
        .await
        .json::<Vec<Value>>();
    assert!(theirs.is_empty());
}

#[tokio::test]
async fn should_update_and_delete_by_id() {
    let store = MemoryRowStore::new();
    let auth = caller(&store, UserRole::Manager);
    let id = store.seed("deals", json!({"name": "Big", "stage": "open"}));
    let server = test_server(&store);

    let updated = server
        .put(&format!("/deals/{id}"))
        .authorization_bearer(auth.token())
        .json(&json!({"stage": "won"}))
        .await
        .json::<Value>();
    assert_eq!(updated["stage"], "won");

    let deleted = server
        .delete(&format!("/deals/{id}"))
        .authorization_bearer(auth.token())
        .await
        .json::<Value>();
    assert_eq!(deleted, json!({"message": "Deal deleted successfully"}));
    assert!(store.get("deals", id).is_none());

    let missing = server
        .get(&format!("/deals/{id}"))
        .authorization_bearer(auth.token())
        .await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(missing.json::<Value>()["kind"], "RECORD_NOT_FOUND");
}

#[tokio::test]
async fn should_answer_malformed_json_with_error_body() {
    let store = MemoryRowStore::new();
    let auth = caller(&store, UserRole::Admin);
    let server = test_server(&store);

    for path in ["/leads", "/me/permissions/check"] {
        let response = server
            .post(path)
            .authorization_bearer(auth.token())
            .bytes(Bytes::from_static(b"{not json"))
            .content_type("application/json")
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "{path}");
        let body = response.json::<Value>();
        assert_eq!(body["kind"], "INVALID_PAYLOAD", "{path}");
        assert!(body["message"].as_str().unwrap().starts_with("invalid payload: "));
    }
    assert!(store.rows("leads").is_empty());
}

#[tokio::test]
async fn should_answer_non_json_content_type_with_error_body() {
    let store = MemoryRowStore::new();
    let auth = caller(&store, UserRole::Admin);
    let server = test_server(&store);

    let response = server
        .put(&format!("/deals/{}", Uuid::new_v4()))
        .authorization_bearer(auth.token())
        .text("stage=won")
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["kind"], "INVALID_PAYLOAD");
}

#[tokio::test]
async fn should_reject_malformed_record_id() {
    let store = MemoryRowStore::new();
    let auth = caller(&store, UserRole::User);
    let server = test_server(&store);

    let response = server
        .get("/leads/not-a-uuid")
        .authorization_bearer(auth.token())
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["kind"], "INVALID_ID");
}

#[tokio::test]
async fn should_forbid_privileged_writes_below_admin() {
    let store = MemoryRowStore::new();
    let manager = caller(&store, UserRole::Manager);
    let admin = caller(&store, UserRole::Admin);
    let branch = store.seed("branches", json!({"name": "HQ", "is_active": true}));
    let server = test_server(&store);

    let denied = server
        .delete(&format!("/branches/{branch}"))
        .authorization_bearer(manager.token())
        .await;
    assert_eq!(denied.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(store.get("branches", branch).unwrap()["is_active"], true);

    let allowed = server
        .delete(&format!("/branches/{branch}"))
        .authorization_bearer(admin.token())
        .await;
    assert_eq!(allowed.status_code(), StatusCode::OK);
    assert_eq!(store.get("branches", branch).unwrap()["is_active"], false);
}

#[tokio::test]
async fn should_refuse_lists_for_callers_without_company() {
    let store = MemoryRowStore::new();
    let orphan = MockAuth::new(UserRole::User, None);
    orphan.seed(&store);
    let server = test_server(&store);

    let response = server
        .get("/leads")
        .authorization_bearer(orphan.token())
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>()["kind"], "MISSING_TENANT");
}

// ── Dashboard ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_serve_dashboard_stats() {
    let store = MemoryRowStore::new();
    let auth = caller(&store, UserRole::User);
    let company = auth.company_id.unwrap().to_string();
    store.seed("leads", json!({"company_id": company}));
    store.seed("invoices", json!({"company_id": company}));
    store.seed("invoices", json!({"company_id": Uuid::new_v4().to_string()}));
    let server = test_server(&store);

    let body = server
        .get("/dashboard/stats")
        .authorization_bearer(auth.token())
        .await
        .json::<Value>();
    assert_eq!(
        body,
        json!({"total_leads": 1, "total_contacts": 0, "total_deals": 0, "total_invoices": 1})
    );
}

#[tokio::test]
async fn should_fail_dashboard_when_any_count_fails() {
    let store = MemoryRowStore::new();
    let auth = caller(&store, UserRole::User);
    store.fail_table("contacts");
    let server = test_server(&store);

    let response = server
        .get("/dashboard/stats")
        .authorization_bearer(auth.token())
        .await;
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>()["kind"], "INTERNAL");
}
