use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use helpdesk_core::{
    load_config, load_config_from_env, seed_from_file, validate_config, Config,
    SqliteTicketStore, TicketStore,
};
use helpdesk_server::{api::create_router, state::AppState};

/// Environment variable naming the config file
const CONFIG_ENV: &str = "HELPDESK_CONFIG";

/// Config file picked up from the working directory when none is named
const DEFAULT_CONFIG_FILE: &str = "config.toml";

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

    let config = resolve_config()?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Database path: {:?}", config.database.path);
    info!(
        "Listing cache: sliding expiration {}s, {:?} invalidation",
        config.cache.sliding_expiration_secs, config.cache.invalidation
    );

    // Create SQLite ticket store
    let ticket_store: Arc<dyn TicketStore> = Arc::new(
        SqliteTicketStore::new(&config.database.path).context("Failed to create ticket store")?,
    );
    info!("Ticket store initialized");

    // Import sample tickets into an empty store
    if let Some(ref seed_path) = config.seed.path {
        match seed_from_file(ticket_store.as_ref(), seed_path) {
            Ok(outcome) => info!("Seeding finished: {:?}", outcome),
            Err(e) => warn!("Seeding from {:?} failed, continuing: {}", seed_path, e),
        }
    }

    let addr = SocketAddr::new(config.server.host, config.server.port);

    // Create app state and router
    let state = Arc::new(AppState::new(config, ticket_store));
    let app = create_router(state);

    // Start server
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

/// Load configuration from `HELPDESK_CONFIG`, `./config.toml`, or defaults.
///
/// A file named through the environment must exist.
fn resolve_config() -> Result<Config> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        let config_path = PathBuf::from(path);
        info!("Loading configuration from {:?}", config_path);
        return load_config(&config_path)
            .with_context(|| format!("Failed to load config from {:?}", config_path));
    }

    let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
    if default_path.exists() {
        info!("Loading configuration from {:?}", default_path);
        return load_config(&default_path)
            .with_context(|| format!("Failed to load config from {:?}", default_path));
    }

    info!("No config file found, using defaults and environment");
    load_config_from_env().context("Failed to load config from environment")
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
