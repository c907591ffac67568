use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crm_core::error::json_error;
use crm_store::StoreError;

/// Functions service error variants.
#[derive(Debug, thiserror::Error)]
pub enum FunctionsError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("caller is not assigned to a company")]
    MissingTenant,
    #[error("amount must be greater than zero")]
    InvalidAmount,
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
    #[error("upstream service failed: {0}")]
    Upstream(String),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl FunctionsError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::MissingTenant => "MISSING_TENANT",
            Self::InvalidAmount => "INVALID_AMOUNT",
            Self::InvalidPayload(_) => "INVALID_PAYLOAD",
            Self::Upstream(_) => "UPSTREAM",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl From<StoreError> for FunctionsError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidPayload(reason) => Self::InvalidPayload(reason),
            StoreError::NotFound => Self::Internal(anyhow::anyhow!("row not found")),
            StoreError::Backend(e) => Self::Internal(e),
        }
    }
}

impl From<JsonRejection> for FunctionsError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidPayload(rejection.body_text())
    }
}

impl IntoResponse for FunctionsError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::MissingTenant => StatusCode::FORBIDDEN,
            Self::InvalidAmount | Self::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        match &self {
            Self::Internal(e) => tracing::error!(error = ?e, kind = "INTERNAL", "internal error"),
            Self::Upstream(reason) => tracing::warn!(%reason, kind = "UPSTREAM", "upstream failure"),
            _ => {}
        }
        json_error(status, self.kind(), self.to_string())
    }
}
