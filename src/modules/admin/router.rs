use crate::modules::admin::controller::{
    create_account, delete_account, reset_password, set_email_verified,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, post, put},
};

pub fn init_admin_router() -> Router<AppState> {
    Router::new()
        .route("/accounts", post(create_account))
        .route("/accounts/password-reset", post(reset_password))
        .route("/accounts/{id}", delete(delete_account))
        .route("/accounts/{id}/email-verified", put(set_email_verified))
}
