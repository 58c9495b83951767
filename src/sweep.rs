use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use time::OffsetDateTime;
use tokio::time::{MissedTickBehavior, interval, timeout};

use crate::store::BookingStore;
use crate::utils::errorhandler::{AppError, AppResult};

/// Flat rate charged per started overdue hour.
pub const PENALTY_RATE: i64 = 50;

const MILLIS_PER_HOUR: i128 = 3_600_000;

// upper bound on any single store call made from the sweep; a stalled store
// must not wedge the timer loop
const STORE_CALL_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SweepOutcome {
    pub expired: usize,
    /// rows that left `Active` between the scan and the write
    pub skipped: usize,
    pub failed: usize,
}

/// Runs the penalty sweep for the lifetime of the process. Passes are
/// strictly serialized: a pass that overruns the interval makes the loop
/// skip the missed ticks instead of firing them back-to-back.
pub async fn run(store: Arc<dyn BookingStore>, every: Duration) {
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        match sweep_once(store.as_ref(), OffsetDateTime::now_utc()).await {
            Ok(outcome) => {
                if outcome != SweepOutcome::default() {
                    tracing::debug!(
                        expired = outcome.expired,
                        skipped = outcome.skipped,
                        failed = outcome.failed,
                        "penalty sweep pass finished"
                    );
                }
            }
            Err(e) => tracing::error!(error = %e, "penalty sweep pass failed"),
        }
    }
}

/// One pass: expire every overdue active booking with a penalty of
/// [`PENALTY_RATE`] per started hour past its end time.
pub async fn sweep_once(store: &dyn BookingStore, now: OffsetDateTime) -> AppResult<SweepOutcome> {
    let overdue = bounded(store.find_overdue_active(now)).await?;

    let mut outcome = SweepOutcome::default();
    for booking in overdue {
        let amount = billable_hours(now - booking.end_time) * PENALTY_RATE;

        match bounded(store.expire_with_penalty(booking.booking_id, amount)).await {
            Ok(true) => {
                tracing::info!(user = %booking.user, slot = %booking.slot, amount, "penalty applied");
                outcome.expired += 1;
            }
            Ok(false) => outcome.skipped += 1,
            Err(e) => {
                // one broken record must not block the rest of the pass
                tracing::warn!(booking_id = %booking.booking_id, error = %e, "failed to expire booking");
                outcome.failed += 1;
            }
        }
    }

    Ok(outcome)
}

/// Whole overdue hours, rounded up: any started hour is billed in full.
pub fn billable_hours(overdue: time::Duration) -> i64 {
    let millis = overdue.whole_milliseconds();
    if millis <= 0 {
        return 0;
    }
    ((millis + MILLIS_PER_HOUR - 1) / MILLIS_PER_HOUR) as i64
}

async fn bounded<T, F>(fut: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match timeout(STORE_CALL_TIMEOUT, fut).await {
        Ok(res) => res,
        Err(_) => Err(AppError::database("store call timed out")),
    }
}
