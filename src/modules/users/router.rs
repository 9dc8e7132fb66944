use crate::modules::users::controller::{change_password, get_profile};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, put},
};

pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_profile))
        .route("/me/password", put(change_password))
}
