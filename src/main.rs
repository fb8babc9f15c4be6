use std::error::Error;

use ai_llm_service::telemetry;
use tracing::{Level, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // A missing .env is fine; variables may come from the environment.
    if dotenvy::dotenv().is_err() {
        eprintln!(".env not loaded; using process environment");
    }

    tracing_subscriber::registry()
        .with(telemetry::env_filter_with_level("info", Level::INFO))
        .with(telemetry::layer())
        .try_init()?;

    info!(version = env!("CARGO_PKG_VERSION"), "pdf insight backend starting");
    api::start().await?;

    Ok(())
}
