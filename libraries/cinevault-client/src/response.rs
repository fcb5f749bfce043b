//! Normalization of HTTP responses and transport failures into [`ApiError`].
//!
//! Every request in the client goes through these helpers; nothing else
//! inspects status codes or constructs errors from raw responses.

use crate::error::{ApiError, Result};
use crate::types::ApiErrorBody;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Convert a transport-level failure (no usable response) into an error.
pub(crate) fn transport_error(err: &reqwest::Error) -> ApiError {
    if err.is_connect() {
        ApiError::NetworkError(format!("Server unreachable: {}", err))
    } else if err.is_timeout() {
        ApiError::NetworkError(format!("Request timed out: {}", err))
    } else {
        ApiError::NetworkError(err.to_string())
    }
}

/// Decode a successful response body, or normalize a failed one.
///
/// `what` names the payload for messages; `not_found` is the message used
/// when the server answers 404.
pub(crate) async fn json_or_error<T>(response: Response, what: &str, not_found: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let status = response.status();
    if !status.is_success() {
        return Err(error_from_response(response, not_found).await);
    }

    let bytes = response.bytes().await.map_err(|e| transport_error(&e))?;
    serde_json::from_slice(&bytes).map_err(|e| {
        warn!(status = %status, error = %e, "Undecodable {} body", what);
        ApiError::ServerError {
            status: status.as_u16(),
            message: format!("Failed to parse {}: {}", what, e),
        }
    })
}

/// Build the error for a non-success response, consuming its body.
pub(crate) async fn error_from_response(response: Response, not_found: &str) -> ApiError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    debug!(status = %status, body = %text, "Request failed");
    error_from_parts(status, &text, not_found)
}

fn error_from_parts(status: StatusCode, text: &str, not_found: &str) -> ApiError {
    let body: ApiErrorBody = serde_json::from_str(text).unwrap_or_default();
    let message = body
        .message
        .or(body.error)
        .filter(|m| !m.trim().is_empty())
        .or_else(|| {
            let trimmed = text.trim();
            (!trimmed.is_empty() && !trimmed.starts_with('{')).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("An unknown error occurred.")
                .to_string()
        });

    match status.as_u16() {
        401 => ApiError::Unauthorized(message),
        404 => ApiError::NotFound(not_found.to_string()),
        code @ 400..=499 => ApiError::Rejected {
            status: code,
            message,
            field_errors: body.errors,
        },
        code => ApiError::ServerError {
            status: code,
            message,
        },
    }
}
