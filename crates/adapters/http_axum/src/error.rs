//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use monika_domain::error::{MonikaError, ValidationError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`MonikaError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(MonikaError);

impl From<MonikaError> for ApiError {
    fn from(err: MonikaError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            MonikaError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            MonikaError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            MonikaError::Dispatch(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            MonikaError::Gateway(err) => {
                tracing::error!(error = %err, "gateway error");
                (StatusCode::BAD_GATEWAY, "gateway unavailable".to_string())
            }
            MonikaError::Inventory(err) => {
                tracing::error!(error = %err, "inventory error");
                (StatusCode::BAD_GATEWAY, "inventory unavailable".to_string())
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
