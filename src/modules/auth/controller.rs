use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::instrument;
use utoipa::ToSchema;

use carebook_auth::NewAccount;
use carebook_core::{AppError, AuthError};
use carebook_models::{
    LoginRequest, LoginResponse, RefreshRequest, RegisterRequest, TokenPair, UserProfile, UserRole,
};
use carebook_observability::{
    track_account_created, track_login_failure, track_login_success, track_token_refresh,
    track_tokens_issued,
};

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[derive(ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

fn failure_reason(err: &AuthError) -> &'static str {
    match err {
        AuthError::InvalidCredentials => "invalid_credentials",
        AuthError::StorageUnavailable(_) => "storage_unavailable",
        _ => "other",
    }
}

/// Login and receive an access/refresh token pair
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 400, description = "Bad request - malformed body", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 503, description = "Credential storage unavailable", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto), fields(email = %dto.email))]
pub async fn login_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let outcome = state
        .auth
        .login(&dto.email, &dto.password)
        .await
        .inspect_err(|e| track_login_failure(failure_reason(e)))?;

    track_login_success(outcome.record.role.as_str());
    track_tokens_issued("access");
    track_tokens_issued("refresh");

    Ok(Json(LoginResponse::from(outcome)))
}

/// Exchange a refresh token for a new token pair
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Tokens refreshed", body = TokenPair),
        (status = 401, description = "Refresh token expired or invalid", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn refresh_tokens(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RefreshRequest>,
) -> Result<Json<TokenPair>, AppError> {
    let result = state.auth.refresh(&dto.refresh_token).await;
    track_token_refresh(result.is_ok());

    let tokens = result?;
    track_tokens_issued("access");
    track_tokens_issued("refresh");

    Ok(Json(tokens))
}

/// Register a patient account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserProfile),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto), fields(email = %dto.email))]
pub async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserProfile>), AppError> {
    let record = state
        .credentials()
        .register(NewAccount::new(dto.email, dto.password, UserRole::Patient))
        .await?;

    track_account_created(record.role.as_str());
    Ok((StatusCode::CREATED, Json(UserProfile::from(&record))))
}

/// Log out
///
/// Tokens are not revoked server-side; the client is expected to discard
/// them.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 204, description = "Logged out"),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn logout_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<StatusCode, AppError> {
    state.auth.logout(auth_user.user_id()?);
    Ok(StatusCode::NO_CONTENT)
}
