//! Application state.
//!
//! Shared state for all request handlers.

use std::sync::Arc;

use tw_pages::PageCache;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Page cache serving lookups, searches and reloads.
    pub(crate) cache: Arc<PageCache>,
    /// Shared secret required by the reload endpoint.
    pub(crate) reload_token: String,
}

impl AppState {
    /// Check a reload token against the configured secret.
    #[must_use]
    pub(crate) fn token_matches(&self, token: &str) -> bool {
        !self.reload_token.is_empty() && token == self.reload_token
    }
}
