use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

// ── Lead scoring ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ScoreLeadRequest {
    pub lead_id: Option<Uuid>,
    /// Lead fields as the client has them; passed to the model verbatim.
    pub lead: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadScore {
    pub score: u8,
    pub reasoning: String,
}

// ── Forecast ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ForecastRequest {
    /// Only honoured for super admins; everyone else gets their own company.
    #[serde(default)]
    pub company_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StageTotals {
    pub deals: usize,
    pub amount: f64,
    pub weighted: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub company_id: Uuid,
    pub open_deals: usize,
    pub pipeline_total: f64,
    /// Sum of `amount * probability / 100` over open deals.
    pub weighted_total: f64,
    pub by_stage: BTreeMap<String, StageTotals>,
    pub narrative: String,
}

// ── Payment ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub invoice_id: Option<Uuid>,
    pub amount: f64,
    pub currency: Option<String>,
    pub provider: Option<String>,
    pub card_number: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Succeeded,
    Declined,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Succeeded => "succeeded",
            Self::Declined => "declined",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentReceipt {
    pub transaction_id: String,
    pub status: PaymentStatus,
    pub amount: f64,
    pub currency: String,
    pub provider: String,
}

// ── Tracking pixel ───────────────────────────────────────────────────────────

#[derive(Debug, Default, PartialEq)]
pub struct OpenEvent {
    pub log_id: Option<Uuid>,
    pub campaign_id: Option<Uuid>,
}

// ── Geo check ────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct GeoCheckRequest {
    pub ip: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoVerdict {
    pub allowed: bool,
    pub country: Option<String>,
}

// ── Scheduled automation ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Fired,
    Skipped,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowOutcome {
    pub workflow_id: Uuid,
    #[serde(flatten)]
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleSummary {
    #[serde(serialize_with = "crm_core::serde::to_rfc3339_ms")]
    pub ran_at: DateTime<Utc>,
    pub checked: usize,
    pub fired: usize,
    pub skipped: usize,
    pub failed: usize,
    pub results: Vec<WorkflowOutcome>,
}

impl ScheduleSummary {
    pub fn new(ran_at: DateTime<Utc>) -> Self {
        Self {
            ran_at,
            checked: 0,
            fired: 0,
            skipped: 0,
            failed: 0,
            results: Vec::new(),
        }
    }

    pub fn record(&mut self, workflow_id: Uuid, outcome: Outcome) {
        self.checked += 1;
        match outcome {
            Outcome::Fired => self.fired += 1,
            Outcome::Skipped => self.skipped += 1,
            Outcome::Failed { .. } => self.failed += 1,
        }
        self.results.push(WorkflowOutcome {
            workflow_id,
            outcome,
        });
    }
}
