use crate::state::AppState;
use axum::{Router, routing::post};

use super::controller::{login_user, logout_user, refresh_tokens, register_user};

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login_user))
        .route("/refresh", post(refresh_tokens))
        .route("/register", post(register_user))
        .route("/logout", post(logout_user))
}
