use serde_json::json;
use uuid::Uuid;

use crm_functions::error::FunctionsError;
use crm_functions::usecase::forecast::ForecastUseCase;
use crm_testing::memory::MemoryRowStore;

use crate::helpers::MockLlm;

#[tokio::test]
async fn should_forecast_only_the_companys_open_deals() {
    let store = MemoryRowStore::new();
    let company = Uuid::new_v4();
    let c = company.to_string();
    store.seed("deals", json!({"company_id": c, "stage": "proposal", "amount": 20000, "probability": 40}));
    store.seed("deals", json!({"company_id": c, "stage": "negotiation", "amount": 5000, "probability": 80}));
    store.seed("deals", json!({"company_id": c, "stage": "closed_won", "amount": 70000, "probability": 100}));
    store.seed("deals", json!({"company_id": Uuid::new_v4().to_string(), "stage": "proposal", "amount": 1000000, "probability": 90}));
    let llm = MockLlm::replying("  Expect roughly 12k this quarter.\n");
    let uc = ForecastUseCase {
        llm: llm.clone(),
        store,
    };

    let forecast = uc.execute(company).await.unwrap();

    assert_eq!(forecast.company_id, company);
    assert_eq!(forecast.open_deals, 2);
    assert_eq!(forecast.pipeline_total, 25000.0);
    assert_eq!(forecast.weighted_total, 12000.0);
    assert_eq!(forecast.by_stage.len(), 2);
    assert_eq!(forecast.narrative, "Expect roughly 12k this quarter.");
    assert!(llm.prompts()[0].contains("\"weighted_total\": 12000.0"));
}

#[tokio::test]
async fn should_not_call_model_for_empty_pipeline() {
    let llm = MockLlm::failing();
    let uc = ForecastUseCase {
        llm: llm.clone(),
        store: MemoryRowStore::new(),
    };

    let forecast = uc.execute(Uuid::new_v4()).await.unwrap();

    assert_eq!(forecast.open_deals, 0);
    assert_eq!(forecast.weighted_total, 0.0);
    assert!(!forecast.narrative.is_empty());
    assert!(llm.prompts().is_empty());
}

#[tokio::test]
async fn should_fail_when_narrative_fails() {
    let store = MemoryRowStore::new();
    let company = Uuid::new_v4();
    store.seed("deals", json!({"company_id": company.to_string(), "amount": 10, "probability": 10}));
    let uc = ForecastUseCase {
        llm: MockLlm::failing(),
        store,
    };
    assert!(matches!(
        uc.execute(company).await,
        Err(FunctionsError::Upstream(_))
    ));
}

#[tokio::test]
async fn should_fail_when_deals_cannot_be_read() {
    let store = MemoryRowStore::new();
    store.fail_table("deals");
    let uc = ForecastUseCase {
        llm: MockLlm::replying("n/a"),
        store,
    };
    assert!(matches!(
        uc.execute(Uuid::new_v4()).await,
        Err(FunctionsError::Internal(_))
    ));
}
