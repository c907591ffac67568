use std::collections::BTreeMap;

use serde_json::{Value, json};
use uuid::Uuid;

use crm_domain::entity::DEALS;
use crm_store::{Row, RowStore, Select};

use crate::domain::repository::LlmGateway;
use crate::domain::types::{Forecast, StageTotals};
use crate::error::FunctionsError;

pub const FORECAST_INSTRUCTIONS: &str = "You are a sales operations analyst. Given pipeline \
totals, write a short forecast for the sales manager: expected revenue, where the pipeline is \
concentrated and one concrete risk. Plain text, at most five sentences.";

const NO_PIPELINE: &str = "There are no open deals in the pipeline.";

/// Stage or status values that take a deal out of the pipeline.
const CLOSED: &[&str] = &["won", "lost", "closed_won", "closed_lost", "closed-won", "closed-lost"];

fn is_open(deal: &Row) -> bool {
    ["stage", "status"].iter().all(|column| {
        deal.get(*column)
            .and_then(Value::as_str)
            .is_none_or(|v| !CLOSED.contains(&v.to_ascii_lowercase().as_str()))
    })
}

/// Numeric column that may come back as a JSON number or a decimal string.
fn number(deal: &Row, column: &str) -> f64 {
    match deal.get(column) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Weighted pipeline over the open deals in `deals`; `narrative` is left empty.
pub fn summarize(company_id: Uuid, deals: &[Row]) -> Forecast {
    let mut by_stage: BTreeMap<String, StageTotals> = BTreeMap::new();
    let mut open_deals = 0;
    let mut pipeline_total = 0.0;
    let mut weighted_total = 0.0;

    for deal in deals.iter().filter(|d| is_open(d)) {
        let amount = number(deal, "amount");
        let probability = number(deal, "probability").clamp(0.0, 100.0);
        let weighted = amount * probability / 100.0;
        let stage = deal
            .get("stage")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_owned();

        open_deals += 1;
        pipeline_total += amount;
        weighted_total += weighted;
        let totals = by_stage.entry(stage).or_default();
        totals.deals += 1;
        totals.amount += amount;
        totals.weighted += weighted;
    }

    for totals in by_stage.values_mut() {
        totals.amount = round2(totals.amount);
        totals.weighted = round2(totals.weighted);
    }

    Forecast {
        company_id,
        open_deals,
        pipeline_total: round2(pipeline_total),
        weighted_total: round2(weighted_total),
        by_stage,
        narrative: String::new(),
    }
}

pub struct ForecastUseCase<L: LlmGateway, S: RowStore> {
    pub llm: L,
    pub store: S,
}

impl<L: LlmGateway, S: RowStore> ForecastUseCase<L, S> {
    pub async fn execute(&self, company_id: Uuid) -> Result<Forecast, FunctionsError> {
        let query = Select::table(DEALS.table).eq(DEALS.tenant_column, company_id.to_string());
        let deals = self.store.select(&query).await?;
        let mut forecast = summarize(company_id, &deals);

        forecast.narrative = if forecast.open_deals == 0 {
            NO_PIPELINE.to_owned()
        } else {
            let figures = json!({
                "open_deals": forecast.open_deals,
                "pipeline_total": forecast.pipeline_total,
                "weighted_total": forecast.weighted_total,
                "by_stage": forecast.by_stage,
            });
            let prompt = format!("Pipeline:\n{figures:#}");
            self.llm
                .complete(FORECAST_INSTRUCTIONS, &prompt)
                .await?
                .trim()
                .to_owned()
        };

        tracing::info!(
            %company_id,
            open_deals = forecast.open_deals,
            weighted_total = forecast.weighted_total,
            "forecast generated"
        );
        Ok(forecast)
    }
}
