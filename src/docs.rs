use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use carebook_auth::{TokenClaims, TokenKind};
use carebook_models::{
    ChangePasswordRequest, CreateAccountRequest, EmailVerifiedRequest, LoginRequest,
    LoginResponse, MessageResponse, RefreshRequest, RegisterRequest, ResetPasswordRequest,
    TokenPair, UserProfile, UserRole,
};

use crate::modules::auth::controller::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::refresh_tokens,
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::logout_user,
        crate::modules::users::controller::get_profile,
        crate::modules::users::controller::change_password,
        crate::modules::admin::controller::create_account,
        crate::modules::admin::controller::reset_password,
        crate::modules::admin::controller::delete_account,
        crate::modules::admin::controller::set_email_verified,
    ),
    components(
        schemas(
            UserRole,
            UserProfile,
            LoginRequest,
            LoginResponse,
            TokenPair,
            RefreshRequest,
            RegisterRequest,
            CreateAccountRequest,
            ChangePasswordRequest,
            ResetPasswordRequest,
            EmailVerifiedRequest,
            MessageResponse,
            TokenClaims,
            TokenKind,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login, token refresh, registration and logout"),
        (name = "Users", description = "The authenticated account"),
        (name = "Admin", description = "Account management for administrators")
    ),
    info(
        title = "Carebook API",
        version = "0.1.0",
        description = "Session and authentication backend for the Carebook booking platform.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
