mod analysis;
mod config;
mod dataset;
mod storage;
mod web;

use std::sync::Arc;
use anyhow::{Context, Result};
use tokio::sync::broadcast;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "brand_monitor=info".into()),
        )
        .init();

    info!("Loading configuration...");
    let config = config::AppConfig::load()?;

    // Bundled sample; the dashboard waits for an upload if it is absent
    let sample = match std::fs::read(&config.dataset.sample_path) {
        Ok(bytes) => {
            let dataset = dataset::load_csv(&bytes).with_context(|| {
                format!("Bundled sample {} is invalid", config.dataset.sample_path.display())
            })?;
            if dataset.is_empty() {
                warn!(
                    "Bundled sample {} has no rows",
                    config.dataset.sample_path.display()
                );
            } else {
                info!(
                    "Loaded bundled sample from {} ({} rows)",
                    config.dataset.sample_path.display(),
                    dataset.len()
                );
            }
            Some(dataset)
        }
        Err(e) => {
            warn!(
                "No bundled sample at {}: {}",
                config.dataset.sample_path.display(),
                e
            );
            None
        }
    };

    let (events_tx, _) = broadcast::channel::<web::state::DatasetEvent>(64);
    let scorer = Arc::new(analysis::LexiconScorer::new());

    let app_state = web::state::AppState::new(
        events_tx,
        sample,
        scorer,
        config.analysis.clone(),
        config.dataset.max_upload_bytes,
    );

    let router = web::create_router(app_state);
    let addr = format!("{}:{}", config.web.host, config.web.port);
    info!("Starting web server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, router).await?;

    Ok(())
}
