//! System handlers: landing page, health, runtime info, OpenAPI.

use crate::api::AppState;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
};
use serde_json::json;

/// GET / - HTML landing page
///
/// A small index for people poking at the service from a browser: current
/// status, the available endpoints, and a pointer to the interactive docs.
#[utoipa::path(
    get,
    path = "/",
    tag = "system",
    responses(
        (status = 200, description = "HTML landing page with endpoint overview", content_type = "text/html")
    )
)]
pub async fn landing_page(State(state): State<AppState>) -> Html<String> {
    let tool_status = if state.converter.tool_available().await {
        "available"
    } else {
        "unavailable"
    };

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>convertd</title>
  <style>
    body {{ font-family: sans-serif; max-width: 48em; margin: 2em auto; padding: 0 1em; }}
    code {{ background: #f0f0f0; padding: 0.1em 0.3em; border-radius: 3px; }}
    table {{ border-collapse: collapse; }}
    td, th {{ text-align: left; padding: 0.3em 1em 0.3em 0; }}
  </style>
</head>
<body>
  <h1>convertd {version}</h1>
  <p>Document conversion service. Conversion tool: <strong>{tool_status}</strong>.
  Artifacts stay downloadable for {retention} minutes after conversion.</p>
  <h2>Endpoints</h2>
  <table>
    <tr><td><code>POST /convert</code></td><td>Convert submitted content (empty body converts a sample document)</td></tr>
    <tr><td><code>GET /download?file={{id}}</code></td><td>Download a published artifact</td></tr>
    <tr><td><code>GET /health</code></td><td>Health check</td></tr>
    <tr><td><code>GET /info</code></td><td>Runtime info and capabilities</td></tr>
    <tr><td><code>GET /openapi.json</code></td><td>OpenAPI specification</td></tr>
  </table>
  <h2>Try it</h2>
  <p><code>curl -X POST http://{bind}/convert</code> converts a generated sample
  document and returns the download URL.</p>
  <p>Interactive API documentation: <a href="/swagger-ui">/swagger-ui</a></p>
</body>
</html>
"#,
        version = env!("CARGO_PKG_VERSION"),
        tool_status = tool_status,
        retention = state.config.retention.retention_minutes,
        bind = state.config.server.api.bind_address,
    ))
}

/// GET /health - Health check
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Service is healthy")
    )
)]
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GET /info - Runtime and capability information
#[utoipa::path(
    get,
    path = "/info",
    tag = "system",
    responses(
        (status = 200, description = "Runtime information and current capabilities"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn runtime_info(State(state): State<AppState>) -> impl IntoResponse {
    let capabilities = state.converter.capabilities().await;

    let info = json!({
        "version": env!("CARGO_PKG_VERSION"),
        "os": std::env::consts::OS,
        "arch": std::env::consts::ARCH,
        "capabilities": capabilities,
        "publish_dir": state.config.publish_dir(),
        "tool_timeout_secs": state.config.conversion.tool_timeout_secs,
    });

    (StatusCode::OK, Json(info))
}

/// GET /openapi.json - OpenAPI specification
#[utoipa::path(
    get,
    path = "/openapi.json",
    tag = "system",
    responses(
        (status = 200, description = "OpenAPI 3.1 specification in JSON format")
    )
)]
pub async fn openapi_spec() -> impl IntoResponse {
    use crate::api::openapi::ApiDoc;
    use utoipa::OpenApi;

    Json(ApiDoc::openapi())
}
