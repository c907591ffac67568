use std::future::Future;

use uuid::Uuid;

use crm_domain::entity::EntityDescriptor;
use crm_domain::tenant::TenantScope;
use crm_store::Row;

use crate::domain::types::{AuthUser, ListFilter};
use crate::error::ApiError;

/// Tenant-scoped access to any registered business table.
pub trait RecordRepository: Send + Sync {
    /// Rows visible to `scope`, newest first.
    fn list(
        &self,
        entity: &EntityDescriptor,
        scope: TenantScope,
        filter: Option<ListFilter>,
    ) -> impl Future<Output = Result<Vec<Row>, ApiError>> + Send;

    /// Row by id, regardless of tenant.
    fn get(
        &self,
        entity: &EntityDescriptor,
        id: Uuid,
    ) -> impl Future<Output = Result<Option<Row>, ApiError>> + Send;

    fn create(
        &self,
        entity: &EntityDescriptor,
        row: Row,
    ) -> impl Future<Output = Result<Row, ApiError>> + Send;

    /// Apply `patch` to the row with `id`, regardless of tenant.
    fn update(
        &self,
        entity: &EntityDescriptor,
        id: Uuid,
        patch: Row,
    ) -> impl Future<Output = Result<Option<Row>, ApiError>> + Send;

    /// Remove the row. Returns `true` if a row was deleted.
    fn remove(
        &self,
        entity: &EntityDescriptor,
        id: Uuid,
    ) -> impl Future<Output = Result<bool, ApiError>> + Send;

    fn count(
        &self,
        entity: &EntityDescriptor,
        scope: TenantScope,
    ) -> impl Future<Output = Result<u64, ApiError>> + Send;
}

/// Lookup of the account behind a token subject.
pub trait UserRepository: Send + Sync {
    fn find_by_id(&self, id: Uuid) -> impl Future<Output = Result<Option<AuthUser>, ApiError>> + Send;
}
