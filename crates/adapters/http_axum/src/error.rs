//! HTTP error response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use devreg_domain::error::RegistryError;

/// Maps [`RegistryError`] to an HTTP response with appropriate status code.
///
/// Decode failures answer `400` with the decoder message as a plain-text body;
/// missing records answer an empty `404`; an exhausted id space is a `500`.
#[derive(Debug)]
pub struct ApiError(RegistryError);

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            RegistryError::Decode(err) => {
                tracing::debug!(error = %err, "rejecting undecodable device payload");
                (StatusCode::BAD_REQUEST, err.to_string()).into_response()
            }
            RegistryError::NotFound(err) => {
                tracing::debug!(error = %err, "device not found");
                StatusCode::NOT_FOUND.into_response()
            }
            RegistryError::IdsExhausted => {
                tracing::error!("device registry has no ids left");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
