use axum::{Json, extract::State};
use uuid::Uuid;

use crm_auth_types::identity::Identity;
use crm_domain::tenant::TenantScope;
use crm_store::RowStore;

use crate::domain::types::{Forecast, ForecastRequest, LeadScore, ScoreLeadRequest};
use crate::error::FunctionsError;
use crate::handlers::auth::Caller;
use crate::handlers::extract::JsonBody;
use crate::state::AppState;

// ── POST /ai-lead-score ──────────────────────────────────────────────────────

pub async fn score_lead<S: RowStore>(
    _caller: Caller,
    State(state): State<AppState<S>>,
    JsonBody(body): JsonBody<ScoreLeadRequest>,
) -> Result<Json<LeadScore>, FunctionsError> {
    Ok(Json(state.scoring().execute(body).await?))
}

// ── POST /ai-forecast ────────────────────────────────────────────────────────

/// Company whose pipeline the caller may forecast. Tenant-bound callers
/// always get their own; a super admin may name one.
fn forecast_company(identity: &Identity, requested: Option<Uuid>) -> Result<Uuid, FunctionsError> {
    match identity.tenant_scope() {
        Some(TenantScope::Company(company)) => Ok(company.0),
        Some(TenantScope::All) => requested
            .or(identity.company_id.map(|c| c.0))
            .ok_or(FunctionsError::MissingTenant),
        None => Err(FunctionsError::MissingTenant),
    }
}

pub async fn forecast<S: RowStore>(
    Caller(identity): Caller,
    State(state): State<AppState<S>>,
    JsonBody(body): JsonBody<ForecastRequest>,
) -> Result<Json<Forecast>, FunctionsError> {
    let company_id = forecast_company(&identity, body.company_id)?;
    Ok(Json(state.forecast().execute(company_id).await?))
}
