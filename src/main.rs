mod config;
mod db;
mod models;
mod payments;
mod route;
mod routemount;
mod state;
mod store;
mod sweep;
mod utils;

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use config::AppConfig;
use db::init_db;
use payments::{CheckoutProvider, StripeClient};
use state::AppState;
use store::{BookingStore, PgBookingStore};

use crate::routemount::route::create_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {

    dotenvy::dotenv().ok();
    init_logger()?;

    let config = AppConfig::from_env()?;

    //connect to db
    let pool = init_db(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let store: Arc<dyn BookingStore> = Arc::new(PgBookingStore::new(pool));
    let payments: Arc<dyn CheckoutProvider> = Arc::new(StripeClient::new(
        config.stripe_secret_key.clone(),
        config.payment_success_url.clone(),
        config.payment_cancel_url.clone(),
    ));

    //penalty sweep runs for the whole process lifetime
    tokio::spawn(sweep::run(
        store.clone(),
        Duration::from_secs(config.sweep_interval_secs),
    ));

    let app = create_router(AppState { store, payments });

    let listener = tokio::net::TcpListener::bind(&config.server_address).await?;
    tracing::info!("server running on {}", config.server_address);
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logger() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    let subscriber = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(subscriber)
        .with(env_filter)
        .try_init()?;

    Ok(())
}
