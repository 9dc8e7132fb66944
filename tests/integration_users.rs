mod common;

use axum::http::StatusCode;
use carebook_auth::{TokenIssuer, TokenKind};
use carebook_models::UserRole;
use common::{
    ADMIN_EMAIL, ADMIN_PASSWORD, access_token, body_json, create_test_account, empty_request,
    generate_unique_email, json_request, login, setup_test_app, test_jwt_config,
};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_get_profile() {
    let app = setup_test_app().await;
    let email = generate_unique_email();
    let account = create_test_account(&app, &email, "Password123", UserRole::Patient).await;
    let token = access_token(&app, &email, "Password123").await;

    let response = app
        .router
        .clone()
        .oneshot(empty_request("GET", "/api/users/me", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"], account.id.to_string());
    assert_eq!(body["email"], email);
    assert_eq!(body["role"], "patient");
}

#[tokio::test]
async fn test_get_profile_without_token() {
    let app = setup_test_app().await;

    let response = app
        .router
        .clone()
        .oneshot(empty_request("GET", "/api/users/me", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Missing or invalid authorization header");
}

#[tokio::test]
async fn test_get_profile_with_garbage_token() {
    let app = setup_test_app().await;

    let response = app
        .router
        .clone()
        .oneshot(empty_request("GET", "/api/users/me", Some("not.a.token")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_get_profile_with_refresh_token() {
    let app = setup_test_app().await;
    let session = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let refresh_token = session["refresh_token"].as_str().unwrap();

    let response = app
        .router
        .clone()
        .oneshot(empty_request("GET", "/api/users/me", Some(refresh_token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_access_token_inside_grace_window_is_rejected() {
    let app = setup_test_app().await;
    let issuer = TokenIssuer::new(&test_jwt_config()).unwrap();
    // Expires in 10 seconds, inside the 30 second grace window.
    let issued_at = chrono::Utc::now().timestamp() - 890;
    let token = issuer
        .issue_at(app.admin.id, UserRole::Admin, TokenKind::Access, issued_at)
        .unwrap();

    let response = app
        .router
        .clone()
        .oneshot(empty_request("GET", "/api/users/me", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Token has expired");
}

#[tokio::test]
async fn test_token_for_removed_account() {
    let app = setup_test_app().await;
    let email = generate_unique_email();
    let account = create_test_account(&app, &email, "Password123", UserRole::Patient).await;
    let token = access_token(&app, &email, "Password123").await;

    app.state.credentials().remove_account(account.id).await.unwrap();

    let response = app
        .router
        .clone()
        .oneshot(empty_request("GET", "/api/users/me", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_change_password() {
    let app = setup_test_app().await;
    let email = generate_unique_email();
    create_test_account(&app, &email, "Password123", UserRole::Doctor).await;
    let token = access_token(&app, &email, "Password123").await;

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/users/me/password",
            &json!({ "current_password": "Password123", "new_password": "NewPassword456" }),
            Some(&token),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let session = login(&app, &email, "NewPassword456").await;
    assert_eq!(session["user"]["email"], email);

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            &json!({ "email": email, "password": "Password123" }),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_change_password_wrong_current() {
    let app = setup_test_app().await;
    let email = generate_unique_email();
    create_test_account(&app, &email, "Password123", UserRole::Patient).await;
    let token = access_token(&app, &email, "Password123").await;

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/users/me/password",
            &json!({ "current_password": "WrongPassword", "new_password": "NewPassword456" }),
            Some(&token),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "Current password is incorrect"
    );
}

#[tokio::test]
async fn test_change_password_too_short() {
    let app = setup_test_app().await;
    let token = access_token(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/users/me/password",
            &json!({ "current_password": ADMIN_PASSWORD, "new_password": "short" }),
            Some(&token),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
