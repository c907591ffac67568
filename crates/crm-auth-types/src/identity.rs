//! Per-request caller identity.

use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use http::HeaderMap;
use serde::Serialize;

use crm_domain::id::{BranchId, CompanyId, UserId};
use crm_domain::tenant::TenantScope;
use crm_domain::user::UserRole;

/// Identity of an authenticated caller, built fresh on every request from
/// the `users` row matching the token subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub id: UserId,
    pub email: String,
    pub role: UserRole,
    pub company_id: Option<CompanyId>,
    pub branch_id: Option<BranchId>,
}

impl Identity {
    /// Rows this caller may list. `None` for a tenant-bound role without a company.
    pub fn tenant_scope(&self) -> Option<TenantScope> {
        TenantScope::resolve(self.role, self.company_id)
    }

    pub fn is_super_admin(&self) -> bool {
        self.role == UserRole::SuperAdmin
    }
}

/// Token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| auth.token().to_owned())
}
