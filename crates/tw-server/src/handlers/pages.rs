//! Page lookup endpoint.
//!
//! Returns the page as JSON: metadata, body text and children.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use tw_pages::Page;

use crate::error::ServerError;
use crate::state::AppState;

/// Handle GET / (root page).
pub(crate) async fn get_root_page(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Page>, ServerError> {
    get_page_impl("", &state)
}

/// Handle GET /{path}.
pub(crate) async fn get_page(
    Path(path): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Page>, ServerError> {
    get_page_impl(&path, &state)
}

fn get_page_impl(path: &str, state: &AppState) -> Result<Json<Page>, ServerError> {
    state
        .cache
        .get(path)
        .map(Json)
        .ok_or_else(|| ServerError::PageNotFound(path.to_owned()))
}
