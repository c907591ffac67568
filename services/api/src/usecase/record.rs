use std::collections::BTreeMap;

use serde_json::Value;
use uuid::Uuid;

use crm_domain::entity::{DeletePolicy, EntityDescriptor, FlagValue};
use crm_domain::tenant::TenantScope;
use crm_store::Row;

use crate::domain::repository::RecordRepository;
use crate::domain::types::ListFilter;
use crate::error::ApiError;

/// Pick the list filter from query parameters.
///
/// Only the entity's `filter_columns` are honoured and only the first one
/// present is applied. `true`/`false` are matched as booleans.
pub fn parse_filter(
    entity: &EntityDescriptor,
    params: &BTreeMap<String, String>,
) -> Option<ListFilter> {
    entity.filter_columns.iter().find_map(|&column| {
        params.get(column).map(|raw| ListFilter {
            column,
            value: match raw.as_str() {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                other => Value::String(other.to_owned()),
            },
        })
    })
}

fn flag_value(value: FlagValue) -> Value {
    match value {
        FlagValue::Bool(b) => Value::Bool(b),
        FlagValue::Text(s) => Value::String(s.to_owned()),
    }
}

// ── FindAll ──────────────────────────────────────────────────────────────────

pub struct ListRecordsUseCase<R: RecordRepository> {
    pub repo: R,
}

impl<R: RecordRepository> ListRecordsUseCase<R> {
    pub async fn execute(
        &self,
        entity: &EntityDescriptor,
        scope: TenantScope,
        filter: Option<ListFilter>,
    ) -> Result<Vec<Row>, ApiError> {
        self.repo.list(entity, scope, filter).await
    }
}

// ── FindOne ──────────────────────────────────────────────────────────────────

pub struct GetRecordUseCase<R: RecordRepository> {
    pub repo: R,
}

impl<R: RecordRepository> GetRecordUseCase<R> {
    pub async fn execute(&self, entity: &EntityDescriptor, id: Uuid) -> Result<Row, ApiError> {
        self.repo
            .get(entity, id)
            .await?
            .ok_or(ApiError::RecordNotFound)
    }
}

// ── Create ───────────────────────────────────────────────────────────────────

pub struct CreateRecordUseCase<R: RecordRepository> {
    pub repo: R,
}

impl<R: RecordRepository> CreateRecordUseCase<R> {
    /// Insert `row` as given. Tenant, branch and owner columns are the
    /// caller's responsibility.
    pub async fn execute(&self, entity: &EntityDescriptor, row: Row) -> Result<Row, ApiError> {
        if row.is_empty() {
            return Err(ApiError::InvalidPayload("empty payload".into()));
        }
        let created = self.repo.create(entity, row).await?;
        tracing::info!(entity = entity.name, id = ?created.get("id"), "record created");
        Ok(created)
    }
}

// ── Update ───────────────────────────────────────────────────────────────────

pub struct UpdateRecordUseCase<R: RecordRepository> {
    pub repo: R,
}

impl<R: RecordRepository> UpdateRecordUseCase<R> {
    pub async fn execute(
        &self,
        entity: &EntityDescriptor,
        id: Uuid,
        patch: Row,
    ) -> Result<Row, ApiError> {
        self.repo
            .update(entity, id, patch)
            .await?
            .ok_or(ApiError::RecordNotFound)
    }
}

// ── Delete ───────────────────────────────────────────────────────────────────

pub struct DeleteRecordUseCase<R: RecordRepository> {
    pub repo: R,
}

impl<R: RecordRepository> DeleteRecordUseCase<R> {
    /// Hard- or soft-delete per the entity's policy and return its fixed
    /// confirmation message. A missing row is not an error.
    pub async fn execute(&self, entity: &EntityDescriptor, id: Uuid) -> Result<String, ApiError> {
        match entity.delete_policy {
            DeletePolicy::Hard => {
                let removed = self.repo.remove(entity, id).await?;
                tracing::info!(entity = entity.name, %id, removed, "record deleted");
            }
            DeletePolicy::Soft { column, value } => {
                let mut patch = Row::new();
                patch.insert(column.to_owned(), flag_value(value));
                let flagged = self.repo.update(entity, id, patch).await?.is_some();
                tracing::info!(entity = entity.name, %id, flagged, "record deactivated");
            }
        }
        Ok(entity.delete_message())
    }
}
