use serde_json::Value;
use uuid::Uuid;

use crm_auth_types::identity::Identity;
use crm_auth_types::token::TokenValidator;
use crm_domain::entity::USERS;
use crm_domain::id::{BranchId, CompanyId};
use crm_domain::user::{USER_STATUS_ACTIVE, UserRole};
use crm_store::{Row, RowStore};

use crate::error::FunctionsError;

/// Bearer token to identity, with the same acceptance rules as the REST API:
/// a valid token whose subject is an active `users` row with a known role.
/// Every rejection is the same 401.
pub struct AuthenticateUseCase<S: RowStore> {
    pub store: S,
    pub tokens: TokenValidator,
}

fn text<'a>(row: &'a Row, column: &str) -> &'a str {
    row.get(column).and_then(Value::as_str).unwrap_or_default()
}

fn uuid_column(row: &Row, column: &str) -> Option<Uuid> {
    text(row, column).parse().ok()
}

impl<S: RowStore> AuthenticateUseCase<S> {
    pub async fn execute(&self, token: &str) -> Result<Identity, FunctionsError> {
        let user_id = self.tokens.validate(token).map_err(|e| {
            tracing::debug!(error = %e, "bearer token rejected");
            FunctionsError::Unauthorized
        })?;

        let Some(row) = self.store.find_by_id(USERS.table, user_id.0).await? else {
            tracing::debug!(%user_id, "token subject not found");
            return Err(FunctionsError::Unauthorized);
        };
        if text(&row, "status") != USER_STATUS_ACTIVE {
            tracing::debug!(%user_id, "inactive account");
            return Err(FunctionsError::Unauthorized);
        }
        let role = text(&row, "role").parse::<UserRole>().map_err(|e| {
            tracing::debug!(%user_id, error = %e, "unusable role");
            FunctionsError::Unauthorized
        })?;

        Ok(Identity {
            id: user_id,
            email: text(&row, "email").to_owned(),
            role,
            company_id: uuid_column(&row, "company_id").map(CompanyId),
            branch_id: uuid_column(&row, "branch_id").map(BranchId),
        })
    }
}
