use axum::{Json, extract::State};

use serde_json::{json, Value};
use crate::{models::booking::{CheckoutReq, PaymentSuccessReq}, state::AppState, utils::errorhandler::AppError};


pub async fn create_checkout(
    State(state): State<AppState>,
    Json(payload): Json<CheckoutReq>
) -> Result<Json<Value>, AppError> {

    if payload.amount <= 0 {
        return Err(AppError::validation("amount must be positive"));
    }

    // unknown ids fail here instead of at the provider
    state.store.find_by_id(payload.booking_id).await?;

    let url = state
        .payments
        .create_session(payload.booking_id, payload.amount)
        .await?;

    Ok(Json(json!({"url": url})))
}

pub async fn payment_success(
    State(state): State<AppState>,
    Json(payload): Json<PaymentSuccessReq>
) -> Result<Json<Value>, AppError> {

    state.store.mark_paid(payload.booking_id).await?;

    Ok(Json(json!({"message": "Payment recorded successfully!"})))
}
