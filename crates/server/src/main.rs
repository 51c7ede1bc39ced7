use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lyricreel_core::{
    load_config, spawn_sweeper, validate_config, InMemoryTaskStore, MediaProvider, MiniMaxClient,
    TaskStore, UploadStore,
};
use lyricreel_server::api::create_router;
use lyricreel_server::state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("LYRICREEL_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("LyricReel {} loading configuration from {:?}", VERSION, config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config)?;

    info!("Configuration loaded successfully");
    info!("Provider base URL: {}", config.provider.base_url);
    info!("Upload directory: {:?}", config.uploads.dir);

    let provider: Arc<dyn MediaProvider> = Arc::new(
        MiniMaxClient::new(&config.provider).context("Failed to create MiniMax client")?,
    );
    if !provider.is_configured() {
        warn!("MINIMAX_API_KEY is not set; /api/generate will fail until it is configured");
    }

    let tasks: Arc<dyn TaskStore> = Arc::new(InMemoryTaskStore::new());

    let uploads = UploadStore::from_config(&config.uploads);
    tokio::fs::create_dir_all(uploads.dir())
        .await
        .with_context(|| format!("Failed to create upload directory {:?}", uploads.dir()))?;

    // Start the upload sweeper
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let sweeper_handle = spawn_sweeper(
        uploads.clone(),
        Duration::from_secs(config.uploads.sweep_interval_secs),
        shutdown_rx,
    );

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), provider, tasks, uploads));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Stop the sweeper
    info!("Server shutting down...");
    let _ = shutdown_tx.send(());
    let _ = sweeper_handle.await;
    info!("Upload sweeper stopped");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
