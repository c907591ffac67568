use serde_json::Value;
use uuid::Uuid;

use crm_domain::entity::{self, EntityDescriptor};
use crm_domain::tenant::TenantScope;
use crm_store::{Row, RowStore, Select};

use crate::domain::repository::{RecordRepository, UserRepository};
use crate::domain::types::{AuthUser, ListFilter};
use crate::error::ApiError;

// ── Record repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct StoreRecordRepository<S> {
    pub store: S,
}

/// `SELECT * FROM <table> [WHERE <tenant_column> = <company>]`.
fn scoped(entity: &EntityDescriptor, scope: TenantScope) -> Select {
    let query = Select::table(entity.table);
    match scope.company() {
        Some(company) => query.eq(entity.tenant_column, company.to_string()),
        None => query,
    }
}

impl<S: RowStore> RecordRepository for StoreRecordRepository<S> {
    async fn list(
        &self,
        entity: &EntityDescriptor,
        scope: TenantScope,
        filter: Option<ListFilter>,
    ) -> Result<Vec<Row>, ApiError> {
        let mut query = scoped(entity, scope);
        if let Some(filter) = filter {
            query = query.eq(filter.column, filter.value);
        }
        let query = query.order(entity.order_column, false);
        Ok(self.store.select(&query).await?)
    }

    async fn get(&self, entity: &EntityDescriptor, id: Uuid) -> Result<Option<Row>, ApiError> {
        Ok(self.store.find_by_id(entity.table, id).await?)
    }

    async fn create(&self, entity: &EntityDescriptor, row: Row) -> Result<Row, ApiError> {
        Ok(self.store.insert(entity.table, row).await?)
    }

    async fn update(
        &self,
        entity: &EntityDescriptor,
        id: Uuid,
        patch: Row,
    ) -> Result<Option<Row>, ApiError> {
        Ok(self.store.update(entity.table, id, patch).await?)
    }

    async fn remove(&self, entity: &EntityDescriptor, id: Uuid) -> Result<bool, ApiError> {
        Ok(self.store.delete(entity.table, id).await?)
    }

    async fn count(&self, entity: &EntityDescriptor, scope: TenantScope) -> Result<u64, ApiError> {
        Ok(self.store.count(&scoped(entity, scope)).await?)
    }
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct StoreUserRepository<S> {
    pub store: S,
}

impl<S: RowStore> UserRepository for StoreUserRepository<S> {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, ApiError> {
        let row = self.store.find_by_id(entity::USERS.table, id).await?;
        Ok(row.map(|row| auth_user_from_row(id, &row)))
    }
}

fn auth_user_from_row(id: Uuid, row: &Row) -> AuthUser {
    let text = |column: &str| {
        row.get(column)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned()
    };
    let uuid = |column: &str| {
        row.get(column)
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<Uuid>().ok())
    };
    AuthUser {
        id,
        email: text("email"),
        role: text("role"),
        status: text("status"),
        company_id: uuid("company_id"),
        branch_id: uuid("branch_id"),
    }
}
