use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{RawQuery, State},
};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crm_auth_types::identity::Identity;
use crm_domain::entity::{self, EntityDescriptor};
use crm_store::{Row, RowStore};

use crate::error::ApiError;
use crate::handlers::auth::CurrentUser;
use crate::handlers::extract::{JsonBody, PathParams};
use crate::state::AppState;
use crate::usecase::record::{
    CreateRecordUseCase, DeleteRecordUseCase, GetRecordUseCase, ListRecordsUseCase,
    UpdateRecordUseCase, parse_filter,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn descriptor(name: &str) -> Result<&'static EntityDescriptor, ApiError> {
    entity::find(name).ok_or(ApiError::UnknownEntity)
}

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    raw.parse().map_err(|_| ApiError::InvalidId)
}

fn into_row(payload: Value) -> Result<Row, ApiError> {
    match payload {
        Value::Object(row) => Ok(row),
        _ => Err(ApiError::InvalidPayload("expected a JSON object".into())),
    }
}

/// Role guard for create, update and delete.
fn authorize_write(entity: &EntityDescriptor, identity: &Identity) -> Result<(), ApiError> {
    if entity.can_write(identity.role) {
        return Ok(());
    }
    tracing::info!(
        entity = entity.name,
        user_id = %identity.id,
        role = %identity.role,
        "write denied by role guard"
    );
    Err(ApiError::Forbidden)
}

/// Stamp the caller's tenant, branch and user id onto a new row.
///
/// Tenant-bound callers always write into their own company. A super admin
/// may name a company in the payload and otherwise gets their own, if any.
/// The branch is only filled in when the payload has none.
fn stamp_create(entity: &EntityDescriptor, identity: &Identity, row: &mut Row) {
    let company = identity.company_id.map(|id| Value::String(id.to_string()));
    match company {
        Some(company) if !identity.is_super_admin() => {
            row.insert(entity.tenant_column.to_owned(), company);
        }
        Some(company) => {
            row.entry(entity.tenant_column).or_insert(company);
        }
        None => {}
    }
    if let Some(branch) = identity.branch_id.filter(|_| entity.branch_scoped) {
        row.entry("branch_id")
            .or_insert_with(|| Value::String(branch.to_string()));
    }
    if let Some(owner) = entity.owner_column {
        row.insert(owner.to_owned(), Value::String(identity.id.to_string()));
    }
}

// ── GET /{entity} ────────────────────────────────────────────────────────────

pub async fn list_records<S: RowStore>(
    user: CurrentUser,
    State(state): State<AppState<S>>,
    PathParams(name): PathParams<String>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<Row>>, ApiError> {
    let entity = descriptor(&name)?;
    let scope = user.scope()?;
    let params: BTreeMap<String, String> = raw_query
        .as_deref()
        .map(serde_qs::from_str)
        .transpose()
        .map_err(|_| ApiError::InvalidQuery)?
        .unwrap_or_default();

    let uc = ListRecordsUseCase {
        repo: state.record_repo(),
    };
    let rows = uc
        .execute(entity, scope, parse_filter(entity, &params))
        .await?;
    Ok(Json(rows))
}

// ── GET /{entity}/{id} ───────────────────────────────────────────────────────

pub async fn get_record<S: RowStore>(
    _user: CurrentUser,
    State(state): State<AppState<S>>,
    PathParams((name, id)): PathParams<(String, String)>,
) -> Result<Json<Row>, ApiError> {
    let entity = descriptor(&name)?;
    let id = parse_id(&id)?;
    let uc = GetRecordUseCase {
        repo: state.record_repo(),
    };
    Ok(Json(uc.execute(entity, id).await?))
}

// ── POST /{entity} ───────────────────────────────────────────────────────────

pub async fn create_record<S: RowStore>(
    CurrentUser(identity): CurrentUser,
    State(state): State<AppState<S>>,
    PathParams(name): PathParams<String>,
    JsonBody(payload): JsonBody<Value>,
) -> Result<Json<Row>, ApiError> {
    let entity = descriptor(&name)?;
    authorize_write(entity, &identity)?;
    if identity.tenant_scope().is_none() {
        return Err(ApiError::MissingTenant);
    }
    let mut row = into_row(payload)?;
    stamp_create(entity, &identity, &mut row);

    let uc = CreateRecordUseCase {
        repo: state.record_repo(),
    };
    Ok(Json(uc.execute(entity, row).await?))
}

// ── PUT /{entity}/{id} ───────────────────────────────────────────────────────

pub async fn update_record<S: RowStore>(
    CurrentUser(identity): CurrentUser,
    State(state): State<AppState<S>>,
    PathParams((name, id)): PathParams<(String, String)>,
    JsonBody(payload): JsonBody<Value>,
) -> Result<Json<Row>, ApiError> {
    let entity = descriptor(&name)?;
    let id = parse_id(&id)?;
    authorize_write(entity, &identity)?;
    let patch = into_row(payload)?;

    let uc = UpdateRecordUseCase {
        repo: state.record_repo(),
    };
    Ok(Json(uc.execute(entity, id, patch).await?))
}

// ── DELETE /{entity}/{id} ────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

pub async fn delete_record<S: RowStore>(
    CurrentUser(identity): CurrentUser,
    State(state): State<AppState<S>>,
    PathParams((name, id)): PathParams<(String, String)>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let entity = descriptor(&name)?;
    let id = parse_id(&id)?;
    authorize_write(entity, &identity)?;

    let uc = DeleteRecordUseCase {
        repo: state.record_repo(),
    };
    let message = uc.execute(entity, id).await?;
    Ok(Json(DeleteResponse { message }))
}
