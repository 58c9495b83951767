use async_trait::async_trait;
use serde::Deserialize;
use uuid::Uuid;

use crate::utils::errorhandler::{AppError, AppResult};

const CHECKOUT_SESSIONS_URL: &str = "https://api.stripe.com/v1/checkout/sessions";

#[async_trait]
pub trait CheckoutProvider: Send + Sync {
    /// Creates a hosted checkout session for `amount` currency units and
    /// returns the redirect URL.
    async fn create_session(&self, booking_id: Uuid, amount: i64) -> AppResult<String>;
}

pub struct StripeClient {
    http: reqwest::Client,
    secret_key: String,
    success_url: String,
    cancel_url: String,
}

impl StripeClient {
    pub fn new(secret_key: String, success_url: String, cancel_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            secret_key,
            success_url,
            cancel_url,
        }
    }
}

#[derive(Deserialize)]
struct CheckoutSession {
    url: String,
}

#[async_trait]
impl CheckoutProvider for StripeClient {
    async fn create_session(&self, booking_id: Uuid, amount: i64) -> AppResult<String> {
        let params: Vec<(&str, String)> = vec![
            ("mode", "payment".into()),
            ("payment_method_types[0]", "card".into()),
            ("line_items[0][quantity]", "1".into()),
            ("line_items[0][price_data][currency]", "inr".into()),
            (
                "line_items[0][price_data][product_data][name]",
                format!("Parking Slot Booking - {booking_id}"),
            ),
            // provider expects the smallest currency unit
            ("line_items[0][price_data][unit_amount]", (amount * 100).to_string()),
            (
                "success_url",
                format!("{}?bookingId={}", self.success_url, booking_id),
            ),
            ("cancel_url", self.cancel_url.clone()),
        ];

        let res = self
            .http
            .post(CHECKOUT_SESSIONS_URL)
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::payment(e.to_string()))?;

        if !res.status().is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(AppError::payment(format!("checkout session rejected: {body}")));
        }

        let session: CheckoutSession = res
            .json()
            .await
            .map_err(|e| AppError::payment(e.to_string()))?;

        Ok(session.url)
    }
}
