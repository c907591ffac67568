use serde::Deserialize;
use serde_json::{Value, json};

use crm_domain::entity::LEADS;
use crm_store::{Row, RowStore};

use crate::domain::repository::LlmGateway;
use crate::domain::types::{LeadScore, ScoreLeadRequest};
use crate::error::FunctionsError;

pub const SCORING_INSTRUCTIONS: &str = "You qualify B2B sales leads. Score how likely the lead \
is to convert, from 0 (no chance) to 100 (ready to buy). Reply with JSON only: \
{\"score\": <integer 0-100>, \"reasoning\": \"<one or two sentences>\"}";

#[derive(Deserialize)]
struct RawScore {
    score: Value,
    #[serde(default)]
    reasoning: String,
}

/// Extract `{score, reasoning}` from model output. Tolerates markdown fences
/// and prose around the JSON object; the score is rounded and clamped.
pub fn parse_score(content: &str) -> Result<LeadScore, FunctionsError> {
    let unparsable = || FunctionsError::Upstream("LLM returned an unparsable score".into());

    let start = content.find('{').ok_or_else(unparsable)?;
    let end = content.rfind('}').ok_or_else(unparsable)?;
    if end < start {
        return Err(unparsable());
    }
    let raw: RawScore = serde_json::from_str(&content[start..=end]).map_err(|_| unparsable())?;
    let score = match &raw.score {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|s| s.is_finite())
    .ok_or_else(unparsable)?;

    Ok(LeadScore {
        score: score.round().clamp(0.0, 100.0) as u8,
        reasoning: raw.reasoning.trim().to_owned(),
    })
}

pub struct ScoreLeadUseCase<L: LlmGateway, S: RowStore> {
    pub llm: L,
    pub store: S,
}

impl<L: LlmGateway, S: RowStore> ScoreLeadUseCase<L, S> {
    pub async fn execute(&self, input: ScoreLeadRequest) -> Result<LeadScore, FunctionsError> {
        if !input.lead.is_object() {
            return Err(FunctionsError::InvalidPayload(
                "lead must be a JSON object".into(),
            ));
        }
        let prompt = format!("Lead:\n{:#}", input.lead);
        let content = self.llm.complete(SCORING_INSTRUCTIONS, &prompt).await?;
        let scored = parse_score(&content)?;

        if let Some(lead_id) = input.lead_id {
            let mut patch = Row::new();
            patch.insert("ai_score".into(), json!(scored.score));
            let stored = self.store.update(LEADS.table, lead_id, patch).await?;
            if stored.is_none() {
                tracing::warn!(%lead_id, "scored lead not found; score not persisted");
            }
        }

        tracing::info!(lead_id = ?input.lead_id, score = scored.score, "lead scored");
        Ok(scored)
    }
}
