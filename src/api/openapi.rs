//! OpenAPI documentation and schema generation
//!
//! This module defines the OpenAPI specification for the convertd REST API
//! using utoipa for compile-time spec generation.

use utoipa::OpenApi;

/// OpenAPI documentation for the convertd REST API
///
/// This struct is used to generate the OpenAPI 3.1 specification that describes
/// all available endpoints, request/response types, and API behavior.
///
/// The spec can be accessed via:
/// - `/openapi.json` - JSON format OpenAPI specification
/// - `/swagger-ui` - Interactive Swagger UI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "convertd REST API",
        version = "0.1.0",
        description = "REST API for converting text documents into PDF and other formats via an external LibreOffice-compatible tool",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        // Conversion
        crate::api::routes::convert_document,

        // Download
        crate::api::routes::download_artifact,

        // System
        crate::api::routes::landing_page,
        crate::api::routes::health_check,
        crate::api::routes::runtime_info,
        crate::api::routes::openapi_spec,
    ),
    components(schemas(
        // Core types from types.rs
        crate::types::InputFormat,
        crate::types::TargetFormat,
        crate::types::Artifact,
        crate::types::ConversionResult,
        crate::types::Capabilities,

        // Config types from config.rs
        crate::config::Config,
        crate::config::ConversionConfig,
        crate::config::RetentionConfig,
        crate::config::ApiConfig,
        crate::config::ServerIntegrationConfig,

        // API request/response types from routes
        crate::api::routes::ConvertRequestBody,
        crate::api::routes::ConvertResponse,
        crate::api::routes::ConversionInfo,
        crate::api::routes::DownloadQuery,

        // Error types from error.rs
        crate::error::ApiError,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "convert", description = "Document conversion - Submit content and publish converted artifacts"),
        (name = "download", description = "Artifact retrieval - Download published artifacts by identifier"),
        (name = "system", description = "System endpoints - Health checks, runtime info, OpenAPI spec"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Security addon to add API key authentication scheme to OpenAPI spec
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = &mut openapi.components {
            components.add_security_scheme(
                "api_key",
                utoipa::openapi::security::SecurityScheme::ApiKey(
                    utoipa::openapi::security::ApiKey::Header(
                        utoipa::openapi::security::ApiKeyValue::new("X-Api-Key"),
                    ),
                ),
            );
        }
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_doc_generation() {
        // Test that the OpenAPI spec can be generated without panicking
        let _spec = ApiDoc::openapi();
    }

    #[test]
    fn test_openapi_spec_has_paths() {
        let spec = ApiDoc::openapi();

        let paths: Vec<&str> = spec.paths.paths.keys().map(String::as_str).collect();
        assert!(paths.contains(&"/"));
        assert!(paths.contains(&"/convert"));
        assert!(paths.contains(&"/download"));
        assert!(paths.contains(&"/health"));
        assert!(paths.contains(&"/info"));
        assert!(paths.contains(&"/openapi.json"));
    }

    #[test]
    fn test_openapi_spec_has_components() {
        let spec = ApiDoc::openapi();

        let components = spec.components.expect("spec should have components");
        assert!(components.schemas.contains_key("ConvertRequestBody"));
        assert!(components.schemas.contains_key("ConvertResponse"));
        assert!(components.schemas.contains_key("ApiError"));
    }

    #[test]
    fn test_openapi_spec_has_tags() {
        let spec = ApiDoc::openapi();

        let tags = spec.tags.expect("spec should have tags");
        let tag_names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
        assert!(tag_names.contains(&"convert"));
        assert!(tag_names.contains(&"download"));
        assert!(tag_names.contains(&"system"));
    }

    #[test]
    fn test_openapi_spec_has_security_scheme() {
        let spec = ApiDoc::openapi();

        let components = spec.components.expect("spec should have components");
        assert!(
            components.security_schemes.contains_key("api_key"),
            "Should have 'api_key' security scheme defined"
        );
    }

    #[test]
    fn test_openapi_json_serialization() {
        let spec = ApiDoc::openapi();

        let json = serde_json::to_value(&spec).expect("Should serialize to JSON");
        let version = json["openapi"].as_str().expect("openapi version field");
        assert!(version.starts_with("3."), "Should use OpenAPI 3.x version");
        assert_eq!(json["info"]["title"], "convertd REST API");
    }
}
