use axum::{Json, extract::State};

use crm_store::RowStore;

use crate::domain::types::{PaymentReceipt, PaymentRequest};
use crate::error::FunctionsError;
use crate::handlers::auth::Caller;
use crate::handlers::extract::JsonBody;
use crate::state::AppState;

/// `POST /mock-payment`. A declined charge is still a 200 with
/// `status: "declined"`.
pub async fn mock_payment<S: RowStore>(
    _caller: Caller,
    State(state): State<AppState<S>>,
    JsonBody(body): JsonBody<PaymentRequest>,
) -> Result<Json<PaymentReceipt>, FunctionsError> {
    Ok(Json(state.payment().execute(body).await?))
}
