//! Helpdesk Gateway - HTTP API for the ticket desk
//!
//! This is the main entry point for the helpdesk service. Every flag can also
//! be given through the environment variable named in `--help`.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use helpdesk_desk::TicketDeskService;
use helpdesk_gateway::{create_router, GatewayConfig, GatewayState};
use helpdesk_store::RocksStore;

/// Helpdesk ticket service.
#[derive(Parser, Debug)]
#[command(name = "helpdesk-gateway")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8090")]
    listen_addr: String,

    /// Directory holding the ticket database.
    #[arg(long, env = "DATA_DIR", default_value = "data/helpdesk")]
    data_dir: PathBuf,

    /// Allowed CORS origins, comma separated. `*` allows any origin.
    #[arg(long, env = "CORS_ORIGINS", value_delimiter = ',', default_value = "*")]
    cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    #[arg(long, env = "MAX_BODY_BYTES", default_value_t = 1024 * 1024)]
    max_body_bytes: usize,

    /// Request timeout in seconds.
    #[arg(long, env = "REQUEST_TIMEOUT_SECONDS", default_value_t = 30)]
    request_timeout_seconds: u64,
}

impl From<Args> for GatewayConfig {
    fn from(args: Args) -> Self {
        Self {
            listen_addr: args.listen_addr,
            data_dir: args.data_dir,
            cors_origins: args.cors_origins,
            max_body_bytes: args.max_body_bytes,
            request_timeout_seconds: args.request_timeout_seconds,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,helpdesk=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Helpdesk Gateway");

    let config = GatewayConfig::from(args);
    tracing::info!(
        listen_addr = %config.listen_addr,
        data_dir = %config.data_dir.display(),
        cors_origins = ?config.cors_origins,
        request_timeout_seconds = config.request_timeout_seconds,
        "Gateway configuration loaded"
    );

    // Initialize RocksDB store
    tracing::info!(path = %config.data_dir.display(), "Opening RocksDB store");
    let store = Arc::new(RocksStore::open(&config.data_dir)?);

    let desk = Arc::new(TicketDeskService::new(store));
    tracing::info!("Ticket desk initialized");

    let listen_addr = config.listen_addr.clone();
    let app = create_router(GatewayState::new(desk, config));

    tracing::info!(listen_addr = %listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Helpdesk Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
