//! Role-based authorization middleware for Axum
//!
//! Two approaches are provided:
//! 1. Layer-based middleware (`require_admin`) for whole routers
//! 2. `check_any_role` for checks inside handlers
//!
//! Authentication always runs first, so a missing or bad token is a 401 and a
//! valid token with the wrong role is a 403.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use carebook_core::AppError;
use carebook_models::UserRole;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Rejects the request unless the authenticated user has one of
/// `allowed_roles`.
///
/// The validated [`AuthUser`] is stored in the request extensions for
/// downstream handlers.
pub async fn require_roles(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    allowed_roles: &[UserRole],
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;
    check_any_role(&auth_user, allowed_roles)?;

    parts.extensions.insert(auth_user);
    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// Admin-only routes.
///
/// # Example
///
/// ```rust,ignore
/// let admin_routes = Router::new()
///     .route("/accounts", post(create_account))
///     .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));
/// ```
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(State(state), req, next, &[UserRole::Admin]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

pub fn check_any_role(auth_user: &AuthUser, allowed_roles: &[UserRole]) -> Result<(), AppError> {
    if !auth_user.has_any_role(allowed_roles) {
        tracing::warn!(role = %auth_user.role(), "Role check failed");
        return Err(AppError::forbidden(format!(
            "Access denied. Required roles: {}, but user has role: {}",
            allowed_roles
                .iter()
                .map(UserRole::as_str)
                .collect::<Vec<_>>()
                .join(", "),
            auth_user.role()
        )));
    }

    Ok(())
}
