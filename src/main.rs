use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use patients_api::store::{FileStore, PatientStore};
use patients_api::{router, AppConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();
    let store = Arc::new(FileStore::new(&config.data_file));

    // Probe the data file so a missing or corrupt file shows up at startup
    match store.load() {
        Ok(patients) => tracing::info!(
            "✓ Loaded {} patient records from {}",
            patients.len(),
            store.path().display()
        ),
        Err(e) => tracing::warn!(
            "⚠ Data file {} not readable: {} (requests will fail until it exists)",
            store.path().display(),
            e
        ),
    }

    let state = AppState::new(store);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("🚀 Server running on http://{}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
