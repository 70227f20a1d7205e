//! # linkup-server
//!
//! Self-hostable backend for Linkup clients.
//!
//! This binary provides:
//! - **REST API** (axum) over the `locations`, `users`, `groups`,
//!   `group_members` and `messages` tables
//! - **Realtime feed**: row changes streamed as server-sent events, filtered
//!   by table and `column=eq.value`

mod api;
mod config;
mod error;

use linkup_store::Database;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::api::AppState;
use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -----------------------------------------------------------------------
    // 1. Initialize tracing (respects RUST_LOG env var)
    // -----------------------------------------------------------------------
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,linkup_server=debug")),
        )
        .init();

    info!("Starting Linkup server v{}", env!("CARGO_PKG_VERSION"));

    // -----------------------------------------------------------------------
    // 2. Load configuration
    // -----------------------------------------------------------------------
    let config = ServerConfig::from_env();
    info!(?config, "Loaded configuration");

    // -----------------------------------------------------------------------
    // 3. Open the store (runs migrations)
    // -----------------------------------------------------------------------
    let db = if config.is_in_memory() {
        Database::open_in_memory()?
    } else {
        Database::open_at(&config.database_path)?
    };
    info!(
        path = %config.database_path.display(),
        instance = %config.instance_name,
        "Store ready"
    );

    let http_addr = config.http_addr;
    let app_state = AppState::new(db, config);

    // -----------------------------------------------------------------------
    // 4. Run the HTTP API server (blocks until shutdown)
    // -----------------------------------------------------------------------
    tokio::select! {
        result = api::serve(app_state, http_addr) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP server failed");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
