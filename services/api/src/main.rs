use sea_orm::Database;
use tracing::info;

use crm_api::config::ApiConfig;
use crm_api::router::build_router;
use crm_api::state::AppState;
use crm_auth_types::token::TokenValidator;
use crm_core::config::Config;
use crm_core::tracing::init_tracing;
use crm_store::SeaRowStore;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = ApiConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let state = AppState {
        store: SeaRowStore::new(db),
        tokens: TokenValidator::hs256(&config.jwt_secret),
    };

    let router = build_router(state);
    let http_addr = format!("0.0.0.0:{}", config.api_port);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .expect("failed to bind");

    info!("api service listening on {http_addr}");
    axum::serve(listener, router).await.expect("server error");
}
