/// Errors reported by a [`RowStore`](crate::RowStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("row not found")]
    NotFound,
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
    #[error("query failed: {0}")]
    Backend(#[from] anyhow::Error),
}
