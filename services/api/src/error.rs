use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crm_core::error::json_error;
use crm_store::StoreError;

/// API service error variants.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("caller is not assigned to a company")]
    MissingTenant,
    #[error("unknown entity")]
    UnknownEntity,
    #[error("record not found")]
    RecordNotFound,
    #[error("invalid id")]
    InvalidId,
    #[error("invalid query")]
    InvalidQuery,
    #[error("invalid path: {0}")]
    InvalidPath(String),
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::MissingTenant => "MISSING_TENANT",
            Self::UnknownEntity => "UNKNOWN_ENTITY",
            Self::RecordNotFound => "RECORD_NOT_FOUND",
            Self::InvalidId => "INVALID_ID",
            Self::InvalidQuery => "INVALID_QUERY",
            Self::InvalidPath(_) => "INVALID_PATH",
            Self::InvalidPayload(_) => "INVALID_PAYLOAD",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Self::RecordNotFound,
            StoreError::InvalidPayload(reason) => Self::InvalidPayload(reason),
            StoreError::Backend(e) => Self::Internal(e),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidPayload(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::InvalidPath(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden | Self::MissingTenant => StatusCode::FORBIDDEN,
            Self::UnknownEntity | Self::RecordNotFound => StatusCode::NOT_FOUND,
            Self::InvalidId
            | Self::InvalidQuery
            | Self::InvalidPath(_)
            | Self::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        json_error(status, self.kind(), self.to_string())
    }
}
