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
    dashboard::get_dashboard_stats,
    health::readyz,
    me::{get_me, get_permissions, post_permissions_check},
    record::{create_record, delete_record, get_record, list_records, update_record},
};
use crate::state::AppState;

pub fn build_router<S: RowStore>(state: AppState<S>) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz::<S>))
        // Caller
        .route("/me", get(get_me))
        .route("/me/permissions", get(get_permissions))
        .route("/me/permissions/check", post(post_permissions_check))
        // Dashboard
        .route("/dashboard/stats", get(get_dashboard_stats::<S>))
        // Generic CRUD; static paths above take precedence over `{entity}`
        .route("/{entity}", get(list_records::<S>).post(create_record::<S>))
        .route(
            "/{entity}/{id}",
            get(get_record::<S>)
                .put(update_record::<S>)
                .delete(delete_record::<S>),
        )
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .layer(cors_layer())
        .with_state(state)
}
