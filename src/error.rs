use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0} is not configured")]
    CredentialMissing(&'static str),

    #[error("{0}")]
    ProviderUnavailable(String),

    #[error("No songs were found in the music catalog")]
    NoMatchesFound,

    #[error("Failed to create playlist: {0}")]
    PlaylistCreateFailed(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Attach the fixed label an endpoint reports for every failure.
    pub fn labeled(self, label: &'static str) -> ApiFailure {
        ApiFailure { label, source: self }
    }
}

/// Body returned for every failed request.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Option<String>,
}

/// An error on its way out of a handler.
#[derive(Debug)]
pub struct ApiFailure {
    label: &'static str,
    source: AppError,
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let status = match self.source {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        tracing::error!("{}: {}", self.label, self.source);

        let body = Json(ErrorResponse {
            error: self.label.to_string(),
            details: Some(self.source.to_string()),
        });

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

pub type HandlerResult<T> = std::result::Result<T, ApiFailure>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let response = AppError::Validation("name: too short".to_string())
            .labeled("Failed to generate playlist")
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_provider_errors_map_to_internal() {
        let response = AppError::NoMatchesFound
            .labeled("Failed to create playlist")
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
