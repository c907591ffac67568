use axum::{Json, extract::State};

use crm_store::RowStore;

use crate::domain::types::DashboardStats;
use crate::error::ApiError;
use crate::handlers::auth::CurrentUser;
use crate::state::AppState;
use crate::usecase::dashboard::DashboardStatsUseCase;

// ── GET /dashboard/stats ─────────────────────────────────────────────────────

pub async fn get_dashboard_stats<S: RowStore>(
    user: CurrentUser,
    State(state): State<AppState<S>>,
) -> Result<Json<DashboardStats>, ApiError> {
    let scope = user.scope()?;
    let uc = DashboardStatsUseCase {
        repo: state.record_repo(),
    };
    Ok(Json(uc.execute(scope).await?))
}
