use axum::extract::State;
use axum::response::Response;

use crm_core::health::readiness;
use crm_store::RowStore;

use crate::state::AppState;

/// `GET /readyz`: the row store must answer a ping.
pub async fn readyz<S: RowStore>(State(state): State<AppState<S>>) -> Response {
    readiness(state.store.ping()).await
}
