//! Mock auth helpers for integration tests.
//!
//! Services authenticate callers from a bearer JWT plus the matching `users`
//! row. `MockAuth` seeds that row into a [`MemoryRowStore`] and signs a token
//! for it with the test secret.

use std::time::Duration;

use serde_json::json;
use uuid::Uuid;

use crm_auth_types::token::issue_access_token;
use crm_domain::id::UserId;
use crm_domain::user::{USER_STATUS_ACTIVE, UserRole};

use crate::memory::MemoryRowStore;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret";

/// A user that exists in the store and can sign requests.
#[derive(Debug, Clone)]
pub struct MockAuth {
    pub user_id: Uuid,
    pub role: UserRole,
    pub company_id: Option<Uuid>,
    pub branch_id: Option<Uuid>,
}

impl MockAuth {
    pub fn new(role: UserRole, company_id: Option<Uuid>) -> Self {
        Self {
            user_id: Uuid::new_v4(),
            role,
            company_id,
            branch_id: None,
        }
    }

    pub fn with_branch(mut self, branch_id: Uuid) -> Self {
        self.branch_id = Some(branch_id);
        self
    }

    /// Insert the active `users` row for this caller.
    pub fn seed(&self, store: &MemoryRowStore) -> &Self {
        self.seed_with_status(store, USER_STATUS_ACTIVE)
    }

    pub fn seed_with_status(&self, store: &MemoryRowStore, status: &str) -> &Self {
        store.seed(
            "users",
            json!({
                "id": self.user_id.to_string(),
                "email": format!("{}@example.com", self.role.as_str()),
                "role": self.role.as_str(),
                "status": status,
                "company_id": self.company_id.map(|id| id.to_string()),
                "branch_id": self.branch_id.map(|id| id.to_string()),
            }),
        );
        self
    }

    /// HS256 token for this user, valid for an hour.
    pub fn token(&self) -> String {
        issue_access_token(
            UserId(self.user_id),
            Duration::from_secs(3600),
            TEST_JWT_SECRET,
        )
        .expect("sign test token")
    }
}
