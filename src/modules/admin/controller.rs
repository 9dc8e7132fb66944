use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use carebook_auth::NewAccount;
use carebook_core::AppError;
use carebook_models::{
    CreateAccountRequest, EmailVerifiedRequest, MessageResponse, ResetPasswordRequest, UserProfile,
};
use carebook_observability::track_account_created;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Create an account with any role (Admin only)
#[utoipa::path(
    post,
    path = "/api/admin/accounts",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = UserProfile),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin role required", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admin"
)]
#[instrument(skip(state, dto), fields(email = %dto.email, role = %dto.role))]
pub async fn create_account(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateAccountRequest>,
) -> Result<(StatusCode, Json<UserProfile>), AppError> {
    let account = NewAccount::new(dto.email, dto.password, dto.role).verified(dto.email_verified);
    let record = state.credentials().register(account).await?;

    track_account_created(record.role.as_str());
    Ok((StatusCode::CREATED, Json(UserProfile::from(&record))))
}

/// Set a new password for an account without knowing the current one (Admin only)
#[utoipa::path(
    post,
    path = "/api/admin/accounts/password-reset",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset", body = MessageResponse),
        (status = 403, description = "Forbidden - admin role required", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admin"
)]
#[instrument(skip(state, dto), fields(email = %dto.email))]
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .credentials()
        .reset_password(&dto.email, &dto.new_password)
        .await?;

    Ok(Json(MessageResponse {
        message: "Password has been reset successfully".to_string(),
    }))
}

/// Remove an account (Admin only)
#[utoipa::path(
    delete,
    path = "/api/admin/accounts/{id}",
    params(
        ("id" = Uuid, Path, description = "Account ID")
    ),
    responses(
        (status = 204, description = "Account removed"),
        (status = 400, description = "Admins cannot remove their own account", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin role required", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admin"
)]
#[instrument(skip(state, auth_user))]
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if auth_user.user_id()? == id {
        return Err(AppError::bad_request(anyhow::anyhow!(
            "Admins cannot remove their own account"
        )));
    }

    state.credentials().remove_account(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Mark an account's email as verified or unverified (Admin only)
#[utoipa::path(
    put,
    path = "/api/admin/accounts/{id}/email-verified",
    params(
        ("id" = Uuid, Path, description = "Account ID")
    ),
    request_body = EmailVerifiedRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserProfile),
        (status = 403, description = "Forbidden - admin role required", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admin"
)]
#[instrument(skip(state))]
pub async fn set_email_verified(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(dto): Json<EmailVerifiedRequest>,
) -> Result<Json<UserProfile>, AppError> {
    let credentials = state.credentials();
    credentials.set_email_verified(id, dto.verified).await?;

    Ok(Json(credentials.profile(id).await?))
}
