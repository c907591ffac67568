use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crm_core::cors::cors_layer;
use crm_core::health::healthz;
use crm_core::middleware::{propagate_request_id_layer, request_id_layer};
use crm_store::RowStore;

use crate::handlers::{
    ai::{forecast, score_lead},
    geo::geo_check,
    health::readyz,
    payment::mock_payment,
    schedule::run_schedule,
    tracking::track_open,
};
use crate::state::AppState;

pub fn build_router<S: RowStore>(state: AppState<S>) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz::<S>))
        // AI
        .route("/ai-lead-score", post(score_lead::<S>))
        .route("/ai-forecast", post(forecast::<S>))
        // Billing
        .route("/mock-payment", post(mock_payment::<S>))
        // Email
        .route("/track-open", get(track_open::<S>))
        // Access
        .route("/geo-check", post(geo_check::<S>))
        // Automation
        .route("/schedule-automation", post(run_schedule::<S>))
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .layer(cors_layer())
        .with_state(state)
}
