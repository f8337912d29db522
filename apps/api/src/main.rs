mod archive;
mod config;
mod draft;
mod errors;
mod export;
mod models;
mod prefs;
mod render;
mod routes;
mod state;
mod storage;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::archive::ResumeArchive;
use crate::config::Config;
use crate::draft::validation::ValidationPolicy;
use crate::draft::DraftStore;
use crate::prefs::Preferences;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{FileStore, KeyValueStore, WriteQueue};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Vitae API v{}", env!("CARGO_PKG_VERSION"));

    // Persistence: one JSON document per key under the data directory,
    // written through a per-key queue so the handlers never block on disk.
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&config.data_dir).await?);
    info!("Store opened at {}", config.data_dir.display());
    let queue = Arc::new(WriteQueue::new(Arc::clone(&store)));

    let drafts = Arc::new(DraftStore::load(store.as_ref(), Arc::clone(&queue)).await);
    let archive = Arc::new(ResumeArchive::load(store.as_ref(), Arc::clone(&queue)).await);
    let prefs = Arc::new(Preferences::load(store.as_ref(), Arc::clone(&queue)).await);

    let state = AppState {
        drafts,
        archive,
        prefs,
        policy: ValidationPolicy::default(),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(queue))
        .await?;

    Ok(())
}

/// Waits for Ctrl-C, then drains pending writes before the process exits.
async fn shutdown_signal(queue: Arc<WriteQueue>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        return;
    }
    info!("Shutdown requested, flushing pending writes");
    queue.flush().await;
    info!("All writes flushed");
}
