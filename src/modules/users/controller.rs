use axum::{Json, extract::State};
use tracing::instrument;

use carebook_core::{AppError, AuthError};
use carebook_models::{ChangePasswordRequest, MessageResponse, UserProfile};

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Get the authenticated account's profile
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Account profile", body = UserProfile),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Account no longer exists", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip_all)]
pub async fn get_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<UserProfile>, AppError> {
    let profile = state.credentials().profile(auth_user.user_id()?).await?;
    Ok(Json(profile))
}

/// Change the authenticated account's password
#[utoipa::path(
    put,
    path = "/api/users/me/password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Current password is incorrect", body = ErrorResponse),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 422, description = "New password violates the password policy", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip_all)]
pub async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let credentials = state.credentials();
    let profile = credentials.profile(auth_user.user_id()?).await?;

    // A 401 here would read as "session over" to clients.
    credentials
        .change_password(&profile.email, &dto.current_password, &dto.new_password)
        .await
        .map_err(|e| match e {
            AuthError::InvalidCredentials => {
                AppError::bad_request(anyhow::anyhow!("Current password is incorrect"))
            }
            other => AppError::from(other),
        })?;

    Ok(Json(MessageResponse {
        message: "Password changed successfully".to_string(),
    }))
}
