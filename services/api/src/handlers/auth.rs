use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crm_auth_types::identity::{Identity, bearer_token};
use crm_domain::tenant::TenantScope;
use crm_store::RowStore;

use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::auth::AuthenticateUseCase;

/// Authenticated caller. Extracting it validates the bearer token and loads
/// the matching active `users` row; any failure rejects with 401.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

impl CurrentUser {
    /// Tenant scope for list and count queries.
    pub fn scope(&self) -> Result<TenantScope, ApiError> {
        self.0.tenant_scope().ok_or(ApiError::MissingTenant)
    }
}

impl<S: RowStore> FromRequestParts<AppState<S>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(ApiError::Unauthorized)?;
        let uc = AuthenticateUseCase {
            users: state.user_repo(),
            tokens: state.tokens.clone(),
        };
        let identity = uc.execute(&token).await?;
        Ok(Self(identity))
    }
}
