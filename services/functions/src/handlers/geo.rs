use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use bytes::Bytes;

use crm_store::RowStore;

use crate::domain::types::{GeoCheckRequest, GeoVerdict};
use crate::error::FunctionsError;
use crate::state::AppState;

const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// The explicit `ip` wins; otherwise the first `x-forwarded-for` hop.
fn client_ip(body: Option<GeoCheckRequest>, headers: &HeaderMap) -> Option<String> {
    body.and_then(|b| b.ip)
        .map(|ip| ip.trim().to_owned())
        .filter(|ip| !ip.is_empty())
        .or_else(|| {
            headers
                .get(X_FORWARDED_FOR)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .map(|ip| ip.trim().to_owned())
                .filter(|ip| !ip.is_empty())
        })
}

/// The body is optional; a blank one means "use the forwarded address".
fn parse_body(body: &[u8]) -> Result<Option<GeoCheckRequest>, FunctionsError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| FunctionsError::InvalidPayload(e.to_string()))
}

/// `POST /geo-check`. Lookup problems allow the caller; only a malformed
/// body is rejected.
pub async fn geo_check<S: RowStore>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<GeoVerdict>, FunctionsError> {
    let ip = client_ip(parse_body(&body)?, &headers);
    Ok(Json(state.geo_check().execute(ip.as_deref()).await))
}
