//! Search endpoint.
//!
//! A body that is missing or not `{"query": "..."}` is rejected as an
//! invalid query.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use serde::Deserialize;
use tw_pages::PageMeta;

use crate::error::ServerError;
use crate::state::AppState;

/// Request body for POST /search.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchRequest {
    /// Literal substring to look for.
    query: String,
}

/// Handle POST /search.
pub(crate) async fn search(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Vec<PageMeta>>, ServerError> {
    let request: SearchRequest = serde_json::from_slice(&body).map_err(|_| {
        ServerError::InvalidQuery("Request body must be JSON with a \"query\" string".to_owned())
    })?;
    Ok(Json(state.cache.search(&request.query)?))
}
