use super::*;
use crate::DocumentConverter;
use crate::test_support::{FakeBehavior, FakeTool, test_config};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use std::time::Duration;
use tempfile::tempdir;
use tower::ServiceExt; // for oneshot


/// Helper to create a test converter with a scripted in-process tool
async fn create_test_converter_with(
    tool: FakeTool,
) -> (Arc<DocumentConverter>, Arc<Config>, tempfile::TempDir) {
    let base = tempdir().unwrap();
    let config = test_config(base.path());
    let converter = DocumentConverter::new(config.clone())
        .await
        .unwrap()
        .with_tool(Arc::new(tool));
    (Arc::new(converter), Arc::new(config), base)
}

/// Helper to create a test converter whose tool always succeeds
async fn create_test_converter() -> (Arc<DocumentConverter>, Arc<Config>, tempfile::TempDir) {
    create_test_converter_with(FakeTool::succeeding()).await
}

/// Collect a response body and parse it as JSON
async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_api_server_spawns() {
    let (converter, config, _base) = create_test_converter().await;

    // Port 0 = OS assigns a free port
    let mut config = (*config).clone();
    config.server.api.bind_address = "127.0.0.1:0".parse().unwrap();
    let config = Arc::new(config);

    let api_handle = tokio::spawn({
        let converter = converter.clone();
        let config = config.clone();
        async move { start_api_server(converter, config).await }
    });

    // Give it a moment to start
    tokio::time::sleep(Duration::from_millis(100)).await;

    api_handle.abort();
}

#[tokio::test]
async fn test_cors_enabled() {
    let (converter, config, _base) = create_test_converter().await;

    let mut config = (*config).clone();
    config.server.api.cors_enabled = true;
    config.server.api.cors_origins = vec!["*".to_string()];
    let config = Arc::new(config);

    let app = create_router(converter, config);

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin"),
        "CORS header should be present when CORS is enabled"
    );
}

#[tokio::test]
async fn test_authentication_with_api_key() {
    let (converter, config, _base) = create_test_converter().await;

    let mut config = (*config).clone();
    config.server.api.api_key = Some("test-secret-key".to_string());
    let config = Arc::new(config);

    let app = create_router(converter, config);

    // Request without API key should return 401
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Request with valid API key should succeed
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("X-Api-Key", "test-secret-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Request with invalid API key should return 401
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("X-Api-Key", "wrong-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_authentication_disabled_by_default() {
    let (converter, config, _base) = create_test_converter().await;

    let app = create_router(converter, config);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_swagger_ui_enabled() {
    let (converter, config, _base) = create_test_converter().await;

    let mut config = (*config).clone();
    config.server.api.swagger_ui = true;
    let config = Arc::new(config);

    let app = create_router(converter, config);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/swagger-ui/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.status(),
        StatusCode::OK,
        "Swagger UI should be accessible when enabled"
    );
}

#[tokio::test]
async fn test_swagger_ui_serves_its_own_spec_copy() {
    let (converter, config, _base) = create_test_converter().await;
    let app = create_router(converter, config);

    // The UI registers its spec at /api/openapi.json; the handcoded
    // /openapi.json route must keep working alongside it
    for uri in ["/api/openapi.json", "/openapi.json"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "spec missing at {uri}");

        let body = body_json(response).await;
        assert_eq!(body["info"]["title"], "convertd REST API", "at {uri}");
    }
}

#[tokio::test]
async fn test_swagger_ui_disabled() {
    let (converter, config, _base) = create_test_converter().await;

    let mut config = (*config).clone();
    config.server.api.swagger_ui = false;
    let config = Arc::new(config);

    let app = create_router(converter, config);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/swagger-ui/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.status(),
        StatusCode::NOT_FOUND,
        "Swagger UI should not be accessible when disabled"
    );
}
