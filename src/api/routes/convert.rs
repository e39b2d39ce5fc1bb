//! Document conversion handler.

use super::{ConversionInfo, ConvertRequestBody, ConvertResponse};
use crate::api::AppState;
use crate::converter::generate_sample_content;
use crate::error::{ApiError, Error};
use crate::types::ConversionRequest;
use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;

/// POST /convert - Convert submitted content and publish the result
///
/// The body is read raw rather than through the JSON extractor so that an
/// empty body (convert a sample document) stays distinct from a malformed
/// one (reject with 400).
#[utoipa::path(
    post,
    path = "/convert",
    tag = "convert",
    request_body(content = ConvertRequestBody, description = "Conversion request; all fields optional"),
    responses(
        (status = 200, description = "Conversion succeeded, artifact published", body = ConvertResponse),
        (status = 400, description = "Malformed request body", body = crate::error::ApiError),
        (status = 500, description = "Conversion or publication failed", body = crate::error::ApiError),
        (status = 503, description = "Conversion tool unavailable", body = crate::error::ApiError)
    ),
    security(
        ("api_key" = [])
    )
)]
pub async fn convert_document(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, Error> {
    let request_body: ConvertRequestBody = if body.is_empty() {
        ConvertRequestBody::default()
    } else {
        match serde_json::from_slice(&body) {
            Ok(parsed) => parsed,
            Err(e) => {
                return Ok((
                    StatusCode::BAD_REQUEST,
                    Json(ApiError::validation(format!("invalid request body: {e}"))),
                )
                    .into_response());
            }
        }
    };

    let content = match request_body.content {
        Some(content) if !content.is_empty() => content,
        _ => generate_sample_content(),
    };
    let request = ConversionRequest {
        content,
        input_format: request_body.input_format.unwrap_or_default(),
        target_format: request_body
            .target_format
            .unwrap_or(state.config.conversion.default_target),
    };

    if !state.converter.tool_available().await {
        return Err(Error::ToolUnavailable(
            "conversion tool did not answer the availability probe".to_string(),
        ));
    }

    let conversion_info = ConversionInfo {
        input_format: request.input_format,
        output_format: request.target_format,
        tool_available: true,
        retention_minutes: state.config.retention.retention_minutes,
    };
    let result = state.converter.convert_document(request).await?;

    let response = ConvertResponse {
        status: "success".to_string(),
        message: result.message,
        output_file: result.output_file,
        file_size: result.file_size,
        download_url: format!("/download?file={}", result.file_id),
        file_id: result.file_id,
        conversion_info,
        timestamp: Utc::now(),
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}
