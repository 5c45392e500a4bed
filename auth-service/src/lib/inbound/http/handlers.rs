use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use crate::identity::errors::AuthError;

pub mod current_identity;
pub mod login;
pub mod token_user;
pub mod validate_token;

/// Query string carrying a token, as in `?token=...`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenQuery {
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    Unauthorized(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
        };

        (status, Json(ApiErrorBody { error: message })).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            AuthError::InvalidToken(_) => {
                ApiError::Unauthorized("Invalid or expired token".to_string())
            }
            // Details stay in the logs.
            AuthError::CredentialStore(_)
            | AuthError::Password(_)
            | AuthError::TokenIssue(_)
            | AuthError::Verification(_) => {
                ApiError::InternalServerError("Authentication service error".to_string())
            }
        }
    }
}

/// Body of every error response: `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorBody {
    pub error: String,
}
