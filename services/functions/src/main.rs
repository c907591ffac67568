use std::time::Duration;

use sea_orm::Database;
use tracing::info;

use crm_auth_types::token::TokenValidator;
use crm_core::config::Config;
use crm_core::tracing::init_tracing;
use crm_functions::config::FunctionsConfig;
use crm_functions::infra::executor::HttpWorkflowExecutor;
use crm_functions::infra::geo::HttpGeoLookup;
use crm_functions::infra::http_client;
use crm_functions::infra::llm::HttpLlmGateway;
use crm_functions::poller::{SchedulePoller, supervise};
use crm_functions::router::build_router;
use crm_functions::state::AppState;
use crm_store::SeaRowStore;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = FunctionsConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");
    let client = http_client().expect("failed to build HTTP client");

    let state = AppState {
        store: SeaRowStore::new(db),
        tokens: TokenValidator::hs256(&config.jwt_secret),
        llm: HttpLlmGateway {
            client: client.clone(),
            base_url: config.llm_gateway_url.clone(),
            api_key: config.llm_api_key.clone(),
            model: config.llm_model.clone(),
        },
        executor: HttpWorkflowExecutor {
            client: client.clone(),
            execute_url: config.automation_execute_url.clone(),
        },
        geo: HttpGeoLookup {
            client,
            base_url: config.geo_lookup_url.clone(),
        },
        blocked_countries: config.blocked_countries().into(),
        payment_decline_rate: config.payment_decline_rate.clamp(0.0, 1.0),
    };

    if config.schedule_poll_secs > 0 {
        let poller = SchedulePoller::spawn(
            state.store.clone(),
            state.executor.clone(),
            Duration::from_secs(config.schedule_poll_secs),
        );
        tokio::spawn(supervise("schedule poller", poller));
    } else {
        info!("schedule poller disabled");
    }

    let router = build_router(state);
    let http_addr = format!("0.0.0.0:{}", config.functions_port);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .expect("failed to bind");

    info!("functions service listening on {http_addr}");
    axum::serve(listener, router).await.expect("server error");
}
