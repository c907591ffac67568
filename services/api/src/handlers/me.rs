use axum::Json;
use serde::{Deserialize, Serialize};

use crm_auth_types::identity::Identity;
use crm_domain::permission::PermissionSet;

use crate::handlers::auth::CurrentUser;
use crate::handlers::extract::JsonBody;
use crate::usecase::permission::{PermissionCheck, check_permissions};

// ── GET /me ──────────────────────────────────────────────────────────────────

pub async fn get_me(CurrentUser(identity): CurrentUser) -> Json<Identity> {
    Json(identity)
}

// ── GET /me/permissions ──────────────────────────────────────────────────────

pub async fn get_permissions(CurrentUser(identity): CurrentUser) -> Json<PermissionSet> {
    Json(PermissionSet::for_role(identity.role))
}

// ── POST /me/permissions/check ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CheckPermissionsRequest {
    pub permission: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub require_all: bool,
}

#[derive(Serialize)]
pub struct CheckPermissionsResponse {
    pub allowed: bool,
}

pub async fn post_permissions_check(
    CurrentUser(identity): CurrentUser,
    JsonBody(body): JsonBody<CheckPermissionsRequest>,
) -> Json<CheckPermissionsResponse> {
    let check = PermissionCheck {
        permission: body.permission,
        permissions: body.permissions,
        require_all: body.require_all,
    };
    Json(CheckPermissionsResponse {
        allowed: check_permissions(identity.role, check),
    })
}
