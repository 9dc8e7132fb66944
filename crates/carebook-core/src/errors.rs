//! Error types shared across the Carebook workspace.
//!
//! Two layers exist:
//!
//! - [`AuthError`]: the closed set of outcomes the authentication core can
//!   produce. Credential and token failures are expected, user-recoverable
//!   conditions; storage and configuration failures are not.
//! - [`AppError`]: an HTTP status paired with an [`anyhow::Error`], rendered
//!   as `{"error": "..."}`. Every [`AuthError`] maps onto exactly one status.

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Failures produced by the credential store, token issuer/validator and
/// authenticator.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Unknown identity or wrong secret. The two are deliberately
    /// indistinguishable.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Token has expired")]
    TokenExpired,

    /// Undecodable token, bad signature, wrong issuer or wrong token kind.
    #[error("Invalid token")]
    TokenMalformed,

    #[error("Credential storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Fatal at startup: a signing secret or connection parameter is absent
    /// or unusable.
    #[error("Configuration missing or invalid: {0}")]
    ConfigurationMissing(String),

    #[error("An account with this email already exists")]
    IdentityTaken,

    #[error("Account not found")]
    AccountNotFound,

    #[error("{0}")]
    PasswordPolicy(String),
}

impl AuthError {
    /// HTTP status this error is surfaced with.
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials | AuthError::TokenExpired | AuthError::TokenMalformed => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AuthError::ConfigurationMissing(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::IdentityTaken => StatusCode::CONFLICT,
            AuthError::AccountNotFound => StatusCode::NOT_FOUND,
            AuthError::PasswordPolicy(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    /// Whether the condition is caused by the caller rather than the server.
    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }

    pub fn storage<E: std::fmt::Display>(err: E) -> Self {
        AuthError::StorageUnavailable(err.to_string())
    }

    pub fn config(message: impl Into<String>) -> Self {
        AuthError::ConfigurationMissing(message.into())
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn unprocessable<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, anyhow::anyhow!(message.into()))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, anyhow::anyhow!(message.into()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status.as_u16(), error = %self.error, "Request failed");
        }

        let body = Json(json!({
            "error": self.error.to_string()
        }));

        (self.status, body).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::new(err.status(), err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_and_token_errors_are_unauthorized() {
        for err in [
            AuthError::InvalidCredentials,
            AuthError::TokenExpired,
            AuthError::TokenMalformed,
        ] {
            assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
            assert!(err.is_client_error());
        }
    }

    #[test]
    fn test_infrastructure_errors_are_server_errors() {
        assert_eq!(
            AuthError::storage("connection refused").status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AuthError::config("JWT_SECRET is not set").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert!(!AuthError::storage("down").is_client_error());
    }

    #[test]
    fn test_app_error_from_auth_error_keeps_message() {
        let app_error: AppError = AuthError::InvalidCredentials.into();
        assert_eq!(app_error.status, StatusCode::UNAUTHORIZED);
        assert_eq!(app_error.error.to_string(), "Invalid email or password");
    }

    #[test]
    fn test_app_error_from_anyhow_is_internal() {
        let app_error: AppError = anyhow::anyhow!("boom").into();
        assert_eq!(app_error.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_into_response_status() {
        let response = AppError::forbidden("Access denied").into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = AppError::from(AuthError::IdentityTaken).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
