use serde::{Deserialize, Serialize};
use sqlx::{Type, prelude::FromRow};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Type, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[sqlx(type_name = "booking_status")]
pub enum BookingStatus {
    #[sqlx(rename = "Active")]
    Active,
    #[sqlx(rename = "Expired")]
    Expired,
    #[sqlx(rename = "Penalty Applied")]
    #[serde(rename = "Penalty Applied")]
    PenaltyApplied,
}

#[derive(Serialize, Deserialize, Debug, Clone, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub booking_id: Uuid,
    #[sqlx(rename = "user_name")]
    pub user: String,
    pub slot: String,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
    pub status: BookingStatus,
    pub penalty: i64,
    pub paid: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingReq {
    pub user: String,
    pub slot: String,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
}

pub struct NewBooking {
    pub user: String,
    pub slot: String,
    pub start_time: OffsetDateTime,
    pub end_time: OffsetDateTime,
}

impl From<CreateBookingReq> for NewBooking {
    fn from(req: CreateBookingReq) -> Self {
        Self {
            user: req.user,
            slot: req.slot,
            start_time: req.start_time,
            end_time: req.end_time,
        }
    }
}

#[derive(Deserialize)]
pub struct ApplyPenaltyReq {
    pub penalty: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReq {
    pub booking_id: Uuid,
    pub amount: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSuccessReq {
    pub booking_id: Uuid,
}
