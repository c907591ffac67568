use axum::extract::FromRequest;

use crate::error::FunctionsError;

/// `Json` whose rejection is an `INVALID_PAYLOAD` error body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(FunctionsError))]
pub struct JsonBody<T>(pub T);
