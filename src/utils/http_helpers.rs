use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, warn};

use crate::error::HelixError;

/// A general purpose HTTP error type that can be converted into an `IntoResponse`.
#[derive(Debug)]
pub struct HTTPError {
    status: StatusCode,
    message: String,
}

impl HTTPError {
    /// Creates a new HTTP error with the given status code and message.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        HTTPError {
            status,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

/// Renders as `{"error": "<message>"}`.
impl IntoResponse for HTTPError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Bad input is the caller's fault; a slow upstream is a gateway timeout;
/// everything else is ours.
impl From<HelixError> for HTTPError {
    fn from(err: HelixError) -> Self {
        let status = match &err {
            HelixError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            HelixError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            HelixError::Configuration(_)
            | HelixError::CredentialFetch(_)
            | HelixError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(
                event_name = "http.upstream.error",
                event_domain = "http",
                status = status.as_u16(),
                "{}",
                err
            );
        } else {
            warn!(event_name = "http.request.rejected", event_domain = "http", "{}", err);
        }
        HTTPError::new(status, err.to_string())
    }
}
