use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use uuid::Uuid;

use crm_core::serde::format_rfc3339_ms;
use crm_domain::entity::CAMPAIGNS;
use crm_store::{Row, RowStore};

use crate::domain::types::OpenEvent;
use crate::error::FunctionsError;

pub const EMAIL_LOGS_TABLE: &str = "email_logs";

/// Transparent 1×1 GIF served by `/track-open`.
pub const PIXEL_GIF: [u8; 43] = [
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00,
    0x00, 0xff, 0xff, 0xff, 0x21, 0xf9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, 0x2c, 0x00, 0x00,
    0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x44, 0x01, 0x00, 0x3b,
];

fn count(row: &Row, column: &str) -> i64 {
    match row.get(column) {
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
        Some(Value::String(s)) => s.parse().unwrap_or(0),
        _ => 0,
    }
}

/// Records an email open. Each side effect is independent and failures are
/// only logged; the caller always serves the pixel.
pub struct RecordOpenUseCase<S: RowStore> {
    pub store: S,
}

impl<S: RowStore> RecordOpenUseCase<S> {
    pub async fn execute(&self, event: OpenEvent, now: DateTime<Utc>) {
        if let Some(log_id) = event.log_id {
            if let Err(e) = self.mark_log_opened(log_id, now).await {
                tracing::warn!(%log_id, error = %e, "failed to record email open");
            }
        }
        if let Some(campaign_id) = event.campaign_id {
            if let Err(e) = self.bump_campaign(campaign_id).await {
                tracing::warn!(%campaign_id, error = %e, "failed to bump campaign open count");
            }
        }
    }

    async fn mark_log_opened(&self, log_id: Uuid, now: DateTime<Utc>) -> Result<(), FunctionsError> {
        let Some(log) = self.store.find_by_id(EMAIL_LOGS_TABLE, log_id).await? else {
            tracing::debug!(%log_id, "open for unknown email log");
            return Ok(());
        };
        let mut patch = Row::new();
        patch.insert("open_count".into(), json!(count(&log, "open_count") + 1));
        if log.get("opened_at").is_none_or(Value::is_null) {
            patch.insert(
                "opened_at".into(),
                json!(format_rfc3339_ms(&now)),
            );
        }
        self.store.update(EMAIL_LOGS_TABLE, log_id, patch).await?;
        Ok(())
    }

    async fn bump_campaign(&self, campaign_id: Uuid) -> Result<(), FunctionsError> {
        let Some(campaign) = self.store.find_by_id(CAMPAIGNS.table, campaign_id).await? else {
            tracing::debug!(%campaign_id, "open for unknown campaign");
            return Ok(());
        };
        let mut patch = Row::new();
        patch.insert(
            "opened_count".into(),
            json!(count(&campaign, "opened_count") + 1),
        );
        self.store.update(CAMPAIGNS.table, campaign_id, patch).await?;
        Ok(())
    }
}
