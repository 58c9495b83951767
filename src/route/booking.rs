use axum::{Json, extract::{State, Path}, http::StatusCode};

use serde_json::{json, Value};
use uuid::Uuid;
use crate::{models::booking::{ApplyPenaltyReq, CreateBookingReq, NewBooking}, state::AppState, utils::errorhandler::AppError};


pub async fn create_booking(
    State(state): State<AppState>,
    Json(payload): Json<CreateBookingReq>
) -> Result<(StatusCode, Json<Value>), AppError> {

        if payload.start_time >= payload.end_time {
            return Err(AppError::validation("startTime must be before endTime"));
        }

        let booking = state.store.insert(NewBooking::from(payload)).await?;

    Ok((StatusCode::CREATED, Json(json!({
        "message": "Booking successful!",
        "booking": booking
    }))))
}

pub async fn get_bookings(
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {

    let bookings = state.store.find_all().await?;

    Ok(Json(json!(bookings)))
}

pub async fn cancel_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {

    state.store.delete(booking_id).await?;

    Ok(Json(json!({"message": "Booking cancelled successfully"})))
}

pub async fn apply_penalty(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    Json(payload): Json<ApplyPenaltyReq>
) -> Result<Json<Value>, AppError> {

    if payload.penalty < 0 {
        return Err(AppError::validation("penalty must be non-negative"));
    }

    let booking = state.store.apply_penalty(booking_id, payload.penalty).await?;

    Ok(Json(json!(booking)))
}
