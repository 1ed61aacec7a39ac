//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Create the application router.
///
/// # Arguments
///
/// * `state` - Shared application state
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/",
            get(handlers::pages::get_root_page).post(handlers::reload::reload),
        )
        .route("/search", post(handlers::search::search))
        .route("/{*path}", get(handlers::pages::get_page))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use tw_archive::MockArchiveSource;
    use tw_pages::{PageCache, PageCacheConfig};

    use super::*;

    const TOKEN: &str = "s3cret-reload-token";

    fn wiki() -> Arc<MockArchiveSource> {
        Arc::new(
            MockArchiveSource::new()
                .with_file("index.md", "---\nname: Home\n---\nWelcome")
                .with_file("docs/index.md", "---\nname: Docs\n---\nAll docs")
                .with_file(
                    "docs/setup.md",
                    "---\nname: Setup\ndescription: Install tools\n---\nRun setup",
                ),
        )
    }

    fn router(source: &Arc<MockArchiveSource>) -> Router {
        let cache = Arc::new(PageCache::new(source.clone(), PageCacheConfig::default()));
        cache.reload().unwrap();
        create_router(Arc::new(AppState {
            cache,
            reload_token: TOKEN.to_owned(),
        }))
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn json_body(body: &[u8]) -> Value {
        serde_json::from_slice(body).unwrap()
    }

    #[tokio::test]
    async fn test_get_root_returns_index_page() {
        let (status, body) = send(router(&wiki()), get("/")).await;

        assert_eq!(status, StatusCode::OK);
        let page = json_body(&body);
        assert_eq!(page["meta"]["canonicalName"], "index");
        assert_eq!(page["meta"]["name"], "Home");
        assert_eq!(page["text"], "Welcome");
        assert_eq!(page["children"][0]["canonicalName"], "docs/index");
    }

    #[tokio::test]
    async fn test_get_page_by_path() {
        let (status, body) = send(router(&wiki()), get("/docs/setup")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json_body(&body),
            json!({
                "meta": {
                    "canonicalName": "docs/setup",
                    "name": "Setup",
                    "description": "Install tools"
                },
                "text": "Run setup"
            })
        );
    }

    #[tokio::test]
    async fn test_get_directory_falls_back_to_index() {
        let (status, body) = send(router(&wiki()), get("/docs")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)["text"], "All docs");

        let (status, body) = send(router(&wiki()), get("/docs/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)["text"], "All docs");
    }

    #[tokio::test]
    async fn test_get_missing_page_is_not_found() {
        let (status, body) = send(router(&wiki()), get("/missing")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json_body(&body)["path"], "missing");
    }

    #[tokio::test]
    async fn test_search_returns_metadata() {
        let (status, body) = send(
            router(&wiki()),
            post_json("/search", &json!({"query": "Install"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json_body(&body),
            json!([{
                "canonicalName": "docs/setup",
                "name": "Setup",
                "description": "Install tools"
            }])
        );
    }

    #[tokio::test]
    async fn test_search_short_query_is_bad_request() {
        let (status, body) =
            send(router(&wiki()), post_json("/search", &json!({"query": "ab"}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json_body(&body)["error"].as_str().unwrap().contains("3 characters"));
    }

    #[tokio::test]
    async fn test_reload_with_invalid_token_is_forbidden() {
        let source = wiki();
        let (status, body) =
            send(router(&source), post_json("/", &json!({"token": "wrong"}))).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, b"invalid token");
        // Only the initial load fetched
        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_reload_with_missing_token_is_forbidden() {
        let (status, _) = send(router(&wiki()), post_json("/", &json!({}))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_reload_without_json_body_is_forbidden() {
        let source = wiki();

        let empty = Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(router(&source), empty).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, b"invalid token");

        let form = Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!("token={TOKEN}")))
            .unwrap();
        let (status, body) = send(router(&source), form).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, b"invalid token");

        let (status, _) = send(router(&source), post_json("/", &json!("just a string"))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        // One initial load per router, no reloads
        assert_eq!(source.fetch_count(), 3);
    }

    #[tokio::test]
    async fn test_search_without_json_body_is_bad_request() {
        let empty = Request::builder()
            .method("POST")
            .uri("/search")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(router(&wiki()), empty).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json_body(&body)["error"].as_str().unwrap().contains("query"));

        let form = Request::builder()
            .method("POST")
            .uri("/search")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("query=Install"))
            .unwrap();
        let (status, _) = send(router(&wiki()), form).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_reload_replaces_pages() {
        let source = wiki();
        let app = router(&source);

        source.set_files([("index.md", "---\nname: New home\n---\nFresh")]);
        let (status, body) = send(app.clone(), post_json("/", &json!({"token": TOKEN}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"ok");

        let (_, body) = send(app.clone(), get("/")).await;
        assert_eq!(json_body(&body)["text"], "Fresh");

        let (status, _) = send(app, get("/docs/setup")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_serving_old_pages() {
        let source = wiki();
        let app = router(&source);

        source.fail_with_status(404);
        let (status, body) = send(app.clone(), post_json("/", &json!({"token": TOKEN}))).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(json_body(&body)["error"].as_str().unwrap().contains("HTTP 404"));

        let (status, body) = send(app, get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)["text"], "Welcome");
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let request = Request::builder()
            .uri("/")
            .header(header::ORIGIN, "https://example.com")
            .body(Body::empty())
            .unwrap();

        let response = router(&wiki()).oneshot(request).await.unwrap();

        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "*"
        );
    }
}
