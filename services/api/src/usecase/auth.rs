use crm_auth_types::identity::Identity;
use crm_auth_types::token::TokenValidator;
use crm_domain::id::{BranchId, CompanyId, UserId};
use crm_domain::user::{USER_STATUS_ACTIVE, UserRole};

use crate::domain::repository::UserRepository;
use crate::error::ApiError;

// ── Authenticate ─────────────────────────────────────────────────────────────

/// Resolve a bearer token to the caller's identity.
///
/// Every rejection (bad signature, expired token, unknown subject, inactive
/// account, unparsable role) surfaces as the same [`ApiError::Unauthorized`];
/// the reason is only logged at debug level. Store failures are not
/// rejections and propagate as internal errors.
pub struct AuthenticateUseCase<U: UserRepository> {
    pub users: U,
    pub tokens: TokenValidator,
}

impl<U: UserRepository> AuthenticateUseCase<U> {
    pub async fn execute(&self, token: &str) -> Result<Identity, ApiError> {
        let user_id = self.tokens.validate(token).map_err(|e| {
            tracing::debug!(error = %e, "bearer token rejected");
            ApiError::Unauthorized
        })?;

        let Some(user) = self.users.find_by_id(user_id.0).await? else {
            tracing::debug!(%user_id, "token subject not found");
            return Err(ApiError::Unauthorized);
        };

        if user.status != USER_STATUS_ACTIVE {
            tracing::debug!(user_id = %user.id, status = %user.status, "inactive account");
            return Err(ApiError::Unauthorized);
        }

        let role = user.role.parse::<UserRole>().map_err(|e| {
            tracing::debug!(user_id = %user.id, error = %e, "unusable role");
            ApiError::Unauthorized
        })?;

        Ok(Identity {
            id: UserId(user.id),
            email: user.email,
            role,
            company_id: user.company_id.map(CompanyId),
            branch_id: user.branch_id.map(BranchId),
        })
    }
}
