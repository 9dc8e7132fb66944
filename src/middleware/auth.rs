use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use uuid::Uuid;

use carebook_auth::TokenClaims;
use carebook_core::AppError;
use carebook_models::UserRole;

use crate::state::AppState;

/// Extractor that validates the bearer access token and provides its claims.
///
/// Rejects with 401 before the handler runs when the header is missing,
/// malformed, or carries an expired or invalid token.
#[derive(Debug, Clone)]
pub struct AuthUser(pub TokenClaims);

impl AuthUser {
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        self.0.user_id().map_err(AppError::from)
    }

    pub fn role(&self) -> UserRole {
        self.0.role
    }

    pub fn has_any_role(&self, roles: &[UserRole]) -> bool {
        roles.contains(&self.0.role)
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::unauthorized("Missing or invalid authorization header"))?;

        let claims = state.auth.authorize(bearer.token())?;

        Ok(AuthUser(claims))
    }
}
