//! REST API server module
//!
//! Provides the HTTP surface of the conversion service: document submission,
//! identifier-gated artifact download, and system endpoints, documented as an
//! OpenAPI specification.

use crate::{Config, DocumentConverter, Result};
use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod auth;
pub mod error_response;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::AppState;

/// Create the API router with all route definitions
///
/// # Routes
///
/// ## Conversion
/// - `POST /convert` - Convert submitted content and publish the artifact
///
/// ## Download
/// - `GET /download?file={id}` - Stream a published artifact
///
/// ## System
/// - `GET /` - HTML landing page with endpoint overview
/// - `GET /health` - Health check
/// - `GET /info` - Runtime info and capabilities
/// - `GET /openapi.json` - OpenAPI specification
/// - `GET /swagger-ui` - Interactive Swagger UI documentation (if enabled)
pub fn create_router(converter: Arc<DocumentConverter>, config: Arc<Config>) -> Router {
    let state = AppState::new(converter, config.clone());

    let router = Router::new()
        // Conversion
        .route("/convert", post(routes::convert_document))
        // Download
        .route("/download", get(routes::download_artifact))
        // System
        .route("/", get(routes::landing_page))
        .route("/health", get(routes::health_check))
        .route("/info", get(routes::runtime_info))
        .route("/openapi.json", get(routes::openapi_spec));

    // Merge Swagger UI routes if enabled in config (before applying state).
    // SwaggerUi serves its own copy of the spec at /api/openapi.json; the
    // /openapi.json route above stays available whether or not the UI is on.
    let router = if config.server.api.swagger_ui {
        router.merge(SwaggerUi::new("/swagger-ui").url("/api/openapi.json", ApiDoc::openapi()))
    } else {
        router
    };

    // Add state to all routes
    let router = router.with_state(state);

    // Apply authentication middleware if API key is configured
    let router = if config.server.api.api_key.is_some() {
        router.layer(middleware::from_fn_with_state(
            config.server.api.api_key.clone(),
            auth::require_api_key,
        ))
    } else {
        router
    };

    // Apply CORS middleware if enabled in config
    if config.server.api.cors_enabled {
        let cors = build_cors_layer(&config.server.api.cors_origins);
        router.layer(cors)
    } else {
        router
    }
}

/// Build a CORS layer based on configured origins
///
/// Supports "*" for any origin; otherwise only the listed origins are allowed.
/// All methods and headers are permitted for cross-origin requests.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let allow_any = origins.iter().any(|o| o == "*");

    if allow_any || origins.is_empty() {
        // Allow all origins (default for local development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Start the API server on the configured bind address.
///
/// Creates a TCP listener, binds it to the configured address, and serves the
/// API router until the server is shut down.
///
/// # Example
///
/// ```no_run
/// use convertd::{Config, DocumentConverter};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Arc::new(Config::default());
/// let converter = Arc::new(DocumentConverter::new((*config).clone()).await?);
///
/// // Start API server (blocks until shutdown)
/// convertd::api::start_api_server(converter, config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_api_server(
    converter: Arc<DocumentConverter>,
    config: Arc<Config>,
) -> Result<()> {
    let bind_address = config.server.api.bind_address;

    tracing::info!(
        address = %bind_address,
        "Starting API server"
    );

    let app = create_router(converter, config);

    let listener = TcpListener::bind(bind_address)
        .await
        .map_err(crate::error::Error::Io)?;

    tracing::info!(
        address = %bind_address,
        "API server listening"
    );

    axum::serve(listener, app)
        .await
        .map_err(|e| crate::error::Error::ApiServerError(e.to_string()))?;

    tracing::info!("API server stopped");
    Ok(())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
