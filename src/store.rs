use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::models::booking::{Booking, NewBooking};
use crate::utils::errorhandler::{AppError, AppResult};

#[async_trait]
pub trait BookingStore: Send + Sync {
    // create a booking with default status/penalty/paid
    async fn insert(&self, new: NewBooking) -> AppResult<Booking>;
    // every booking, for the admin dashboard
    async fn find_all(&self) -> AppResult<Vec<Booking>>;
    async fn find_by_id(&self, booking_id: Uuid) -> AppResult<Booking>;
    // active bookings whose end_time has passed
    async fn find_overdue_active(&self, now: OffsetDateTime) -> AppResult<Vec<Booking>>;
    // Active -> Expired with the given penalty; false when the row already
    // left Active, so concurrent sweeps assess at most once
    async fn expire_with_penalty(&self, booking_id: Uuid, amount: i64) -> AppResult<bool>;
    // Active -> Penalty Applied with the given penalty
    async fn apply_penalty(&self, booking_id: Uuid, amount: i64) -> AppResult<Booking>;
    async fn mark_paid(&self, booking_id: Uuid) -> AppResult<()>;
    async fn delete(&self, booking_id: Uuid) -> AppResult<()>;
}

pub struct PgBookingStore {
    pool: PgPool,
}

impl PgBookingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn insert(&self, new: NewBooking) -> AppResult<Booking> {
        let booking = sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (user_name, slot, start_time, end_time)
             VALUES ($1, $2, $3, $4)
             RETURNING booking_id, user_name, slot, start_time, end_time, status, penalty, paid, created_at",
        )
        .bind(&new.user)
        .bind(&new.slot)
        .bind(new.start_time)
        .bind(new.end_time)
        .fetch_one(&self.pool)
        .await?;

        Ok(booking)
    }

    async fn find_all(&self) -> AppResult<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT booking_id, user_name, slot, start_time, end_time, status, penalty, paid, created_at
             FROM bookings
             ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    async fn find_by_id(&self, booking_id: Uuid) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>(
            "SELECT booking_id, user_name, slot, start_time, end_time, status, penalty, paid, created_at
             FROM bookings
             WHERE booking_id = $1",
        )
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found("booking not found"))
    }

    async fn find_overdue_active(&self, now: OffsetDateTime) -> AppResult<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT booking_id, user_name, slot, start_time, end_time, status, penalty, paid, created_at
             FROM bookings
             WHERE status = 'Active' AND end_time < $1
             ORDER BY end_time ASC",
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    async fn expire_with_penalty(&self, booking_id: Uuid, amount: i64) -> AppResult<bool> {
        // conditional on the stored status: of two racing writers only one
        // sees rows_affected = 1
        let res = sqlx::query(
            "UPDATE bookings
             SET status = 'Expired', penalty = $2
             WHERE booking_id = $1 AND status = 'Active'",
        )
        .bind(booking_id)
        .bind(amount)
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected() > 0)
    }

    async fn apply_penalty(&self, booking_id: Uuid, amount: i64) -> AppResult<Booking> {
        let updated = sqlx::query_as::<_, Booking>(
            "UPDATE bookings
             SET status = 'Penalty Applied', penalty = $2
             WHERE booking_id = $1 AND status = 'Active'
             RETURNING booking_id, user_name, slot, start_time, end_time, status, penalty, paid, created_at",
        )
        .bind(booking_id)
        .bind(amount)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(booking) => Ok(booking),
            None => {
                let exists = sqlx::query_scalar::<_, bool>(
                    "SELECT EXISTS(SELECT 1 FROM bookings WHERE booking_id = $1)",
                )
                .bind(booking_id)
                .fetch_one(&self.pool)
                .await?;

                if exists {
                    Err(AppError::validation("booking is no longer active"))
                } else {
                    Err(AppError::not_found("booking not found"))
                }
            }
        }
    }

    async fn mark_paid(&self, booking_id: Uuid) -> AppResult<()> {
        let res = sqlx::query("UPDATE bookings SET paid = TRUE WHERE booking_id = $1")
            .bind(booking_id)
            .execute(&self.pool)
            .await?;

        if res.rows_affected() < 1 {
            return Err(AppError::not_found("booking not found"));
        }

        Ok(())
    }

    async fn delete(&self, booking_id: Uuid) -> AppResult<()> {
        let res = sqlx::query("DELETE FROM bookings WHERE booking_id = $1")
            .bind(booking_id)
            .execute(&self.pool)
            .await?;

        if res.rows_affected() < 1 {
            return Err(AppError::not_found("booking not found"));
        }

        Ok(())
    }
}

#[cfg(test)]
pub mod memory {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use super::*;
    use crate::models::booking::BookingStatus;

    // in-memory stand-in with the same conditional-update semantics as the
    // Postgres store
    #[derive(Default)]
    pub struct MemoryStore {
        bookings: Mutex<Vec<Booking>>,
        failing: Mutex<HashSet<Uuid>>,
    }

    impl MemoryStore {
        pub fn new() -> Self {
            Self::default()
        }

        // makes every update on the given booking fail
        pub fn fail_updates_for(&self, booking_id: Uuid) {
            self.failing.lock().unwrap().insert(booking_id);
        }

        pub fn get(&self, booking_id: Uuid) -> Option<Booking> {
            self.bookings
                .lock()
                .unwrap()
                .iter()
                .find(|b| b.booking_id == booking_id)
                .cloned()
        }

        fn check_failing(&self, booking_id: Uuid) -> AppResult<()> {
            if self.failing.lock().unwrap().contains(&booking_id) {
                return Err(AppError::database("injected store failure"));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl BookingStore for MemoryStore {
        async fn insert(&self, new: NewBooking) -> AppResult<Booking> {
            let booking = Booking {
                booking_id: Uuid::new_v4(),
                user: new.user,
                slot: new.slot,
                start_time: new.start_time,
                end_time: new.end_time,
                status: BookingStatus::Active,
                penalty: 0,
                paid: false,
                created_at: OffsetDateTime::now_utc(),
            };
            self.bookings.lock().unwrap().push(booking.clone());
            Ok(booking)
        }

        async fn find_all(&self) -> AppResult<Vec<Booking>> {
            Ok(self.bookings.lock().unwrap().clone())
        }

        async fn find_by_id(&self, booking_id: Uuid) -> AppResult<Booking> {
            self.get(booking_id)
                .ok_or_else(|| AppError::not_found("booking not found"))
        }

        async fn find_overdue_active(&self, now: OffsetDateTime) -> AppResult<Vec<Booking>> {
            Ok(self
                .bookings
                .lock()
                .unwrap()
                .iter()
                .filter(|b| b.status == BookingStatus::Active && b.end_time < now)
                .cloned()
                .collect())
        }

        async fn expire_with_penalty(&self, booking_id: Uuid, amount: i64) -> AppResult<bool> {
            self.check_failing(booking_id)?;
            let mut bookings = self.bookings.lock().unwrap();
            match bookings
                .iter_mut()
                .find(|b| b.booking_id == booking_id && b.status == BookingStatus::Active)
            {
                Some(b) => {
                    b.status = BookingStatus::Expired;
                    b.penalty = amount;
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn apply_penalty(&self, booking_id: Uuid, amount: i64) -> AppResult<Booking> {
            self.check_failing(booking_id)?;
            let mut bookings = self.bookings.lock().unwrap();
            match bookings
                .iter_mut()
                .find(|b| b.booking_id == booking_id && b.status == BookingStatus::Active)
            {
                Some(b) => {
                    b.status = BookingStatus::PenaltyApplied;
                    b.penalty = amount;
                    Ok(b.clone())
                }
                None => {
                    if bookings.iter().any(|b| b.booking_id == booking_id) {
                        Err(AppError::validation("booking is no longer active"))
                    } else {
                        Err(AppError::not_found("booking not found"))
                    }
                }
            }
        }

        async fn mark_paid(&self, booking_id: Uuid) -> AppResult<()> {
            self.check_failing(booking_id)?;
            let mut bookings = self.bookings.lock().unwrap();
            match bookings.iter_mut().find(|b| b.booking_id == booking_id) {
                Some(b) => {
                    b.paid = true;
                    Ok(())
                }
                None => Err(AppError::not_found("booking not found")),
            }
        }

        async fn delete(&self, booking_id: Uuid) -> AppResult<()> {
            let mut bookings = self.bookings.lock().unwrap();
            let before = bookings.len();
            bookings.retain(|b| b.booking_id != booking_id);
            if bookings.len() == before {
                return Err(AppError::not_found("booking not found"));
            }
            Ok(())
        }
    }
}
