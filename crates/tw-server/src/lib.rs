//! HTTP server for thinwiki.
//!
//! Exposes the page cache over three routes:
//! - `GET /{path}` returns a page (`GET /` is the `index` page)
//! - `POST /search` with `{"query": "..."}` returns matching page metadata
//! - `POST /` with `{"token": "..."}` reloads the cache from the repository
//!
//! Every response allows any origin.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use tw_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let cache = Arc::new(PageCache::new(source, PageCacheConfig::default()));
//!     cache.reload().unwrap();
//!
//!     let config = ServerConfig {
//!         host: "127.0.0.1".to_owned(),
//!         port: 3000,
//!         reload_token: "s3cret".to_owned(),
//!     };
//!     run_server(config, cache).await.unwrap();
//! }
//! ```

mod app;
mod error;
mod handlers;
mod state;

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

pub use error::ServerError;
use state::AppState;
use tw_pages::PageCache;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Shared secret for the reload endpoint.
    pub reload_token: String,
}

/// Run the server until Ctrl-C.
///
/// The cache should already hold a loaded snapshot.
///
/// # Arguments
///
/// * `config` - Server configuration
/// * `cache` - Page cache to serve
///
/// # Errors
///
/// Returns an error if the address is invalid or the server fails to start.
pub async fn run_server(
    config: ServerConfig,
    cache: Arc<PageCache>,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(AppState {
        cache,
        reload_token: config.reload_token,
    });

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}
