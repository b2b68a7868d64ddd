use crate::comparison::ComparisonError;
use crate::config::ConfigError;
use crate::responses::{LifecycleError, StoreError};
use crate::telemetry::TelemetryError;
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
    Store(StoreError),
    Lifecycle(LifecycleError),
    Comparison(ComparisonError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Lifecycle(LifecycleError::RequiredAnswerMissing { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Comparison(
                ComparisonError::UnknownSession(_)
                | ComparisonError::UnknownVendor(_)
                | ComparisonError::UnknownQuestion(_),
            ) => StatusCode::NOT_FOUND,
            AppError::Comparison(ComparisonError::InvalidRating(_) | ComparisonError::NoVendors) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Store(err) => write!(f, "store error: {}", err),
            AppError::Lifecycle(err) => write!(f, "{}", err),
            AppError::Comparison(err) => write!(f, "{}", err),
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
            AppError::Store(err) => Some(err),
            AppError::Lifecycle(err) => Some(err),
            AppError::Comparison(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
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

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<LifecycleError> for AppError {
    fn from(value: LifecycleError) -> Self {
        Self::Lifecycle(value)
    }
}

impl From<ComparisonError> for AppError {
    fn from(value: ComparisonError) -> Self {
        Self::Comparison(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::QuestionId;

    #[test]
    fn validation_errors_map_to_client_statuses() {
        let missing = AppError::from(LifecycleError::RequiredAnswerMissing {
            question_id: QuestionId::new("pricing_model"),
            prompt: "Pricing model".to_string(),
        });
        assert_eq!(missing.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let unknown = AppError::from(ComparisonError::UnknownSession("cmp-9".to_string()));
        assert_eq!(unknown.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(unknown.to_string(), "comparison session `cmp-9` was not found");

        let rating = AppError::from(ComparisonError::InvalidRating(7.0));
        assert_eq!(rating.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn infrastructure_errors_are_internal() {
        let store = AppError::from(StoreError::Unavailable("offline".to_string()));
        assert_eq!(store.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(std::error::Error::source(&store).is_some());
    }
}
