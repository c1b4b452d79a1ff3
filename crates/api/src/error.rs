//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use registration::RegistrationError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Registration workflow error.
    Registration(RegistrationError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Registration(err) => registration_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                let body = serde_json::json!({ "error": msg });
                (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
            }
        }
    }
}

fn registration_error_to_response(err: RegistrationError) -> Response {
    let status = match &err {
        RegistrationError::Validation(_) => StatusCode::BAD_REQUEST,
        RegistrationError::CategoryNotFound(_) | RegistrationError::AccountNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        RegistrationError::DuplicateEmail(_) => StatusCode::CONFLICT,
        RegistrationError::InvalidCredential(_) => StatusCode::UNAUTHORIZED,
        // The registration persisted; only the credential pair is
        // missing. 502 tells the client the signer failed, and the
        // retriable flag below says to retry issuance, not sign-up.
        RegistrationError::TokenIssuanceFailed(_) => StatusCode::BAD_GATEWAY,
        RegistrationError::UserCreationFailed(_)
        | RegistrationError::ShopCreationFailed(_)
        | RegistrationError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        tracing::error!(kind = err.kind(), error = %err, "registration request failed");
    }

    let body = serde_json::json!({
        "error": err.to_string(),
        "kind": err.kind(),
        "retriable_issuance": err.is_retriable_issuance(),
    });
    (status, axum::Json(body)).into_response()
}

impl From<RegistrationError> for ApiError {
    fn from(err: RegistrationError) -> Self {
        ApiError::Registration(err)
    }
}
