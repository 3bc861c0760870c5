use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::{error, warn};

pub const INTERNAL_ERROR_MESSAGE: &str = "Erro interno do servidor";

/// Error leaving a handler. Rendered as `{"ok": false, "error": message}`;
/// `detail` is only logged.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub detail: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into(), detail: None }
    }

    pub fn not_found() -> Self {
        ServiceError::not_found().into()
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Model(_) => ApiError::new(StatusCode::BAD_REQUEST, e.to_string()),
            ServiceError::NotFound(_) => ApiError::new(StatusCode::NOT_FOUND, e.to_string()),
            ServiceError::Remote { .. } => ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            ServiceError::Http(_) | ServiceError::Decode(_) => ApiError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: INTERNAL_ERROR_MESSAGE.to_string(),
                detail: Some(e.to_string()),
            },
        }
    }
}

impl From<models::errors::ModelError> for ApiError {
    fn from(e: models::errors::ModelError) -> Self {
        ServiceError::from(e).into()
    }
}

/// Bodies that are not JSON at all are reported like any other invalid payload.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError {
            status: StatusCode::BAD_REQUEST,
            message: format!("Dados inválidos: {}", rejection.body_text()),
            detail: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let detail = self.detail.as_deref().unwrap_or_default();
        if self.status.is_server_error() {
            error!(status = self.status.as_u16(), error = %self.message, %detail, "request failed");
        } else {
            warn!(status = self.status.as_u16(), error = %self.message, "request rejected");
        }
        (self.status, Json(serde_json::json!({"ok": false, "error": self.message}))).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
