use std::collections::BTreeMap;

use axum::extract::{RawQuery, State};
use axum::http::header;
use axum::response::IntoResponse;
use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

use crm_store::RowStore;

use crate::domain::types::OpenEvent;
use crate::state::AppState;
use crate::usecase::tracking::PIXEL_GIF;

/// Ids are read leniently; a malformed one is dropped, never rejected.
fn open_event(raw_query: Option<&str>) -> OpenEvent {
    let params: BTreeMap<String, String> = raw_query
        .and_then(|q| serde_qs::from_str(q).ok())
        .unwrap_or_default();
    let id = |name: &str| params.get(name).and_then(|v| v.parse::<Uuid>().ok());
    OpenEvent {
        log_id: id("log_id"),
        campaign_id: id("campaign_id"),
    }
}

pub fn pixel() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "image/gif"),
            (
                header::CACHE_CONTROL,
                "no-store, no-cache, must-revalidate, private",
            ),
            (header::PRAGMA, "no-cache"),
            (header::EXPIRES, "0"),
        ],
        Bytes::from_static(&PIXEL_GIF),
    )
}

/// `GET /track-open?log_id=&campaign_id=`. Always answers with the pixel.
pub async fn track_open<S: RowStore>(
    State(state): State<AppState<S>>,
    RawQuery(raw_query): RawQuery,
) -> impl IntoResponse {
    let event = open_event(raw_query.as_deref());
    state.record_open().execute(event, Utc::now()).await;
    pixel()
}
