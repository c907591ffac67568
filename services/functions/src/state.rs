use std::sync::Arc;

use crm_auth_types::token::TokenValidator;
use crm_store::{RowStore, SeaRowStore};

use crate::infra::executor::HttpWorkflowExecutor;
use crate::infra::geo::HttpGeoLookup;
use crate::infra::llm::HttpLlmGateway;
use crate::usecase::forecast::ForecastUseCase;
use crate::usecase::geo::GeoCheckUseCase;
use crate::usecase::payment::MockPaymentUseCase;
use crate::usecase::schedule::ScheduleAutomationUseCase;
use crate::usecase::scoring::ScoreLeadUseCase;
use crate::usecase::tracking::RecordOpenUseCase;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState<S = SeaRowStore> {
    pub store: S,
    pub tokens: TokenValidator,
    pub llm: HttpLlmGateway,
    pub executor: HttpWorkflowExecutor,
    pub geo: HttpGeoLookup,
    /// Upper-case ISO country codes.
    pub blocked_countries: Arc<[String]>,
    pub payment_decline_rate: f64,
}

impl<S: RowStore> AppState<S> {
    pub fn scoring(&self) -> ScoreLeadUseCase<HttpLlmGateway, S> {
        ScoreLeadUseCase {
            llm: self.llm.clone(),
            store: self.store.clone(),
        }
    }

    pub fn forecast(&self) -> ForecastUseCase<HttpLlmGateway, S> {
        ForecastUseCase {
            llm: self.llm.clone(),
            store: self.store.clone(),
        }
    }

    pub fn payment(&self) -> MockPaymentUseCase<S> {
        MockPaymentUseCase {
            store: self.store.clone(),
            decline_rate: self.payment_decline_rate,
        }
    }

    pub fn record_open(&self) -> RecordOpenUseCase<S> {
        RecordOpenUseCase {
            store: self.store.clone(),
        }
    }

    pub fn geo_check(&self) -> GeoCheckUseCase<HttpGeoLookup> {
        GeoCheckUseCase {
            geo: self.geo.clone(),
            blocked: self.blocked_countries.clone(),
        }
    }

    pub fn schedule(&self) -> ScheduleAutomationUseCase<S, HttpWorkflowExecutor> {
        ScheduleAutomationUseCase {
            store: self.store.clone(),
            executor: self.executor.clone(),
        }
    }
}
