use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Error body shared by every service. `kind` is a stable SCREAMING_CASE
/// code; `message` is for humans and may change.
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub kind: &'a str,
    pub message: String,
}

pub fn json_error(status: StatusCode, kind: &str, message: String) -> Response {
    (status, Json(ErrorBody { kind, message })).into_response()
}
