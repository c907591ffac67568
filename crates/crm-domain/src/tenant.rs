//! Tenant scoping.

use crate::id::CompanyId;
use crate::user::UserRole;

/// Which rows a caller may list.
///
/// Super admins see every tenant; everyone else is pinned to their company.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantScope {
    All,
    Company(CompanyId),
}

impl TenantScope {
    /// Resolve the scope for a caller. `None` when a tenant-bound role has no company.
    pub fn resolve(role: UserRole, company_id: Option<CompanyId>) -> Option<Self> {
        if role == UserRole::SuperAdmin {
            return Some(Self::All);
        }
        company_id.map(Self::Company)
    }

    pub fn company(self) -> Option<CompanyId> {
        match self {
            Self::All => None,
            Self::Company(id) => Some(id),
        }
    }
}
