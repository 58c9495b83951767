use anyhow::Context;

pub struct AppConfig {
    pub database_url: String,
    pub server_address: String,
    pub stripe_secret_key: String,
    pub payment_success_url: String,
    pub payment_cancel_url: String,
    pub sweep_interval_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .context("DATABASE_URL is missing in env")?,
            server_address: std::env::var("SERVER_ADDRESS")
                .unwrap_or("0.0.0.0:5001".to_string()),
            stripe_secret_key: std::env::var("STRIPE_SECRET_KEY")
                .context("STRIPE_SECRET_KEY is missing in env")?,
            payment_success_url: std::env::var("PAYMENT_SUCCESS_URL")
                .unwrap_or("http://localhost:3000/success".to_string()),
            payment_cancel_url: std::env::var("PAYMENT_CANCEL_URL")
                .unwrap_or("http://localhost:3000/cancel".to_string()),
            sweep_interval_secs: std::env::var("SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
        })
    }
}
