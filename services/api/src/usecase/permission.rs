use crm_domain::permission::{Gate, PermissionSet, Requirement};
use crm_domain::user::UserRole;

/// Options of a permission check, as a gate would be configured.
#[derive(Debug, Clone, Default)]
pub struct PermissionCheck {
    pub permission: Option<String>,
    pub permissions: Vec<String>,
    pub require_all: bool,
}

/// Whether `role` passes the gate described by `check`. A check naming no
/// permission at all passes.
pub fn check_permissions(role: UserRole, check: PermissionCheck) -> bool {
    let requirement =
        Requirement::from_options(check.permission, check.permissions, check.require_all);
    Gate::<()>::new(requirement).allows(&PermissionSet::for_role(role))
}
