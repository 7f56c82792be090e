use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::ideas::{IdeaServiceError, RepositoryError};
use crate::workflows::intake::IngestionError;
use crate::workflows::scoring::WeightError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Ingestion(IngestionError),
    Weights(WeightError),
    Repository(RepositoryError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Ingestion(err) => write!(f, "ingestion error: {}", err),
            AppError::Weights(err) => write!(f, "invalid weights: {}", err),
            AppError::Repository(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Ingestion(err) => Some(err),
            AppError::Weights(err) => Some(err),
            AppError::Repository(err) => Some(err),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Ingestion(_) | AppError::Weights(_) => StatusCode::BAD_REQUEST,
            AppError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            AppError::Repository(RepositoryError::Unavailable(_))
            | AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<IngestionError> for AppError {
    fn from(value: IngestionError) -> Self {
        Self::Ingestion(value)
    }
}

impl From<WeightError> for AppError {
    fn from(value: WeightError) -> Self {
        Self::Weights(value)
    }
}

impl From<IdeaServiceError> for AppError {
    fn from(value: IdeaServiceError) -> Self {
        match value {
            IdeaServiceError::Ingestion(err) => Self::Ingestion(err),
            IdeaServiceError::Weights(err) => Self::Weights(err),
            IdeaServiceError::Repository(err) => Self::Repository(err),
        }
    }
}
