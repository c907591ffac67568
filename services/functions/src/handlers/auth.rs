use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crm_auth_types::identity::{Identity, bearer_token};
use crm_store::RowStore;

use crate::error::FunctionsError;
use crate::state::AppState;
use crate::usecase::auth::AuthenticateUseCase;

/// Signed-in caller of a tenant-data function.
#[derive(Debug, Clone)]
pub struct Caller(pub Identity);

impl<S: RowStore> FromRequestParts<AppState<S>> for Caller {
    type Rejection = FunctionsError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(FunctionsError::Unauthorized)?;
        let uc = AuthenticateUseCase {
            store: state.store.clone(),
            tokens: state.tokens.clone(),
        };
        Ok(Self(uc.execute(&token).await?))
    }
}
