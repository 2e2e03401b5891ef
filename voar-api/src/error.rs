use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use voar_aggregator::AggregateError;
use voar_core::ProviderError;

#[derive(Debug)]
pub enum AppError {
    /// Upstream provider answered with a non-success status.
    UpstreamError { provider: String, status: u16 },
    /// Upstream payload was missing its expected structure.
    MalformedUpstream(String),
    InternalServerError(String),
    Anyhow(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::UpstreamError { provider, status } => {
                tracing::error!(%provider, status, "upstream provider error");
                (
                    StatusCode::BAD_GATEWAY,
                    format!("Upstream API error {}", status),
                )
            }
            AppError::MalformedUpstream(detail) => {
                tracing::error!(%detail, "unexpected upstream response shape");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected upstream response".to_string(),
                )
            }
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::UpstreamStatus { provider, status } => {
                AppError::UpstreamError { provider, status }
            }
            ProviderError::MalformedResponse { message, .. } => {
                AppError::MalformedUpstream(message)
            }
            ProviderError::Transport { .. } => AppError::InternalServerError(err.to_string()),
        }
    }
}

impl From<AggregateError> for AppError {
    fn from(err: AggregateError) -> Self {
        match err {
            AggregateError::Provider(inner) => inner.into(),
            AggregateError::Timeout { .. } | AggregateError::AllProvidersFailed => {
                AppError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Anyhow(err)
    }
}
