use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::api::types::ErrorResponse;
use crate::error::FuelError;

/// Handler error, rendered as `{success: false, message}`.
#[derive(Debug)]
pub struct ApiError(pub FuelError);

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(FuelError::validation(msg))
    }

    pub fn status(&self) -> StatusCode {
        match self.0 {
            FuelError::Validation(_) | FuelError::InsufficientBanked { .. } => {
                StatusCode::BAD_REQUEST
            }
            FuelError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<FuelError> for ApiError {
    fn from(err: FuelError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if self.0.is_client_error() {
            self.0.to_string()
        } else {
            error!(error = %self.0, "request failed");
            "Internal server error".to_string()
        };

        (
            status,
            Json(ErrorResponse {
                success: false,
                message,
            }),
        )
            .into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
