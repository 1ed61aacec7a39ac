//! Reload endpoint.
//!
//! Rebuilds the page cache from a fresh repository snapshot. The request
//! must carry the configured shared secret. A body that is missing, not
//! JSON, or without a `token` field counts as a wrong token.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use serde::Deserialize;

use crate::error::ServerError;
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ReloadRequest {
    /// Shared reload secret.
    #[serde(default)]
    token: String,
}

/// Handle POST / (reload).
///
/// The reload runs on the blocking pool; lookups keep being served from the
/// previous snapshot until it finishes.
pub(crate) async fn reload(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<&'static str, ServerError> {
    let request: ReloadRequest = serde_json::from_slice(&body).unwrap_or_default();
    if !state.token_matches(&request.token) {
        tracing::warn!("Reload rejected: invalid token");
        return Err(ServerError::InvalidToken);
    }

    let cache = Arc::clone(&state.cache);
    let stats = tokio::task::spawn_blocking(move || cache.reload())
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))??;

    tracing::info!(
        pages = stats.pages,
        elapsed_ms = stats.elapsed.as_secs_f64() * 1000.0,
        "Reload requested over HTTP completed"
    );

    Ok("ok")
}
