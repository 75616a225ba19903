//! HTTP error response conversion
//!
//! Handlers return `Result<_, HttpAppError>`. Anything that converts into
//! `AppError` (storage errors, anyhow errors) renders the same way: a JSON body
//! with a human message and a machine code, plus a log line at the level the
//! error variant asks for.
//!
//! The body never carries `details` on its own. Non-sensitive errors attach
//! them as a response extension, and the `expose_error_details` layer installed
//! by the router decides whether they reach the client.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tubely_core::{AppError, ErrorMetadata, LogLevel};
use tubely_storage::StorageError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            details: None,
        }
    }
}

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rules: both the trait and AppError live in other crates)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        HttpAppError(err.into())
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    let details = error.detailed_message();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %details, error_type = error_type, "Request failed");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %details, error_type = error_type, "Request failed");
        }
        LogLevel::Error => {
            tracing::error!(error = %details, error_type = error_type, "Request failed");
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let body = ErrorResponse::new(app_error.client_message(), app_error.error_code());
        let details = (!app_error.is_sensitive()).then(|| ErrorDetails {
            body: body.clone(),
            details: app_error.detailed_message(),
        });

        let mut response = (status, Json(body)).into_response();
        if let Some(details) = details {
            response.extensions_mut().insert(details);
        }
        response
    }
}

/// Detail text a non-sensitive error may show the client.
#[derive(Debug, Clone)]
struct ErrorDetails {
    body: ErrorResponse,
    details: String,
}

/// Response layer: re-render error bodies with `details` when `expose` is set
/// (non-production environments).
pub async fn expose_error_details(State(expose): State<bool>, mut response: Response) -> Response {
    let Some(ErrorDetails { body, details }) = response.extensions_mut().remove::<ErrorDetails>()
    else {
        return response;
    };
    if !expose {
        return response;
    }

    let body = ErrorResponse {
        details: Some(details),
        ..body
    };
    (response.status(), Json(body)).into_response()
}
