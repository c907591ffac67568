use crm_auth_types::token::TokenValidator;
use crm_store::{RowStore, SeaRowStore};

use crate::infra::store::{StoreRecordRepository, StoreUserRepository};

/// Shared application state passed to every handler via axum `State`.
///
/// Generic over the row store so the router can run against an in-memory
/// store in tests.
#[derive(Clone)]
pub struct AppState<S = SeaRowStore> {
    pub store: S,
    pub tokens: TokenValidator,
}

impl<S: RowStore> AppState<S> {
    pub fn record_repo(&self) -> StoreRecordRepository<S> {
        StoreRecordRepository {
            store: self.store.clone(),
        }
    }

    pub fn user_repo(&self) -> StoreUserRepository<S> {
        StoreUserRepository {
            store: self.store.clone(),
        }
    }
}
