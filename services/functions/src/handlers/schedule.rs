use axum::{Json, extract::State};
use chrono::Utc;

use crm_store::RowStore;

use crate::domain::types::ScheduleSummary;
use crate::error::FunctionsError;
use crate::state::AppState;

/// `POST /schedule-automation`: run one dispatch pass now.
pub async fn run_schedule<S: RowStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<ScheduleSummary>, FunctionsError> {
    Ok(Json(state.schedule().execute(Utc::now()).await?))
}
