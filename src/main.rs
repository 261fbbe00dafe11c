use anyhow::Result;
use hammerqr::config::Config;
use hammerqr::payload::serialize;
use hammerqr::schema::{hammer_schema, validate_schema};
use hammerqr::store::ConfigStore;
use hammerqr::timezone::{Clock, SystemClock};
use hammerqr::web::{self, AppState};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().map_err(|e| {
        eprintln!("Failed to load configuration: {e}");
        e
    })?;
    config.validate()?;

    hammerqr::logging::init_logging(&config.logging)?;

    let schema = hammer_schema();
    validate_schema(&schema)?;

    // Composition root: the store is created here and handed to everything else
    let store = Arc::new(ConfigStore::from_config(&config, schema));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let initial = serialize(
        &store.sections(),
        config.qr.max_config_values,
        clock.as_ref(),
    );
    info!(
        "hammerqr {} starting; initial payload: {:?} (over capacity: {})",
        env!("APP_VERSION"),
        initial.text,
        initial.over_capacity
    );

    let state = AppState::new(Arc::clone(&store), &config, clock);
    if let Err(e) = web::serve(state, &config).await {
        error!("Web server error: {}", e);
        return Err(anyhow::anyhow!("Web server error: {}", e));
    }

    Ok(())
}
