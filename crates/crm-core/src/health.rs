use std::fmt::Display;
use std::future::Future;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::error::json_error;

/// Liveness check for `GET /healthz`.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Readiness body: 200 when `check` succeeds, otherwise 503 with an
/// `UNAVAILABLE` error. Services wrap this in their own `GET /readyz`
/// handler since each owns its state type and backend.
pub async fn readiness<E, F>(check: F) -> Response
where
    E: Display,
    F: Future<Output = Result<(), E>>,
{
    match check.await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            json_error(
                StatusCode::SERVICE_UNAVAILABLE,
                "UNAVAILABLE",
                "service unavailable".into(),
            )
        }
    }
}
