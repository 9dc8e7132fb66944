mod common;

use axum::http::StatusCode;
use carebook_models::UserRole;
use common::{
    ADMIN_EMAIL, ADMIN_PASSWORD, TestApp, access_token, body_json, create_test_account,
    empty_request, generate_unique_email, json_request, login, setup_test_app,
};
use serde_json::json;
use tower::ServiceExt;

async fn admin_token(app: &TestApp) -> String {
    access_token(app, ADMIN_EMAIL, ADMIN_PASSWORD).await
}

#[tokio::test]
async fn test_create_account_as_admin() {
    let app = setup_test_app().await;
    let token = admin_token(&app).await;
    let email = generate_unique_email();

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/admin/accounts",
            &json!({
                "email": email,
                "password": "DoctorPass1",
                "role": "doctor",
                "email_verified": true
            }),
            Some(&token),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["role"], "doctor");
    assert_eq!(body["email_verified"], true);

    let session = login(&app, &email, "DoctorPass1").await;
    assert_eq!(session["user"]["role"], "doctor");
}

#[tokio::test]
async fn test_create_account_unknown_role() {
    let app = setup_test_app().await;
    let token = admin_token(&app).await;

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/admin/accounts",
            &json!({
                "email": generate_unique_email(),
                "password": "Password123",
                "role": "nurse"
            }),
            Some(&token),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_routes_forbidden_for_non_admins() {
    let app = setup_test_app().await;

    for role in [UserRole::Doctor, UserRole::Patient] {
        let email = generate_unique_email();
        create_test_account(&app, &email, "Password123", role).await;
        let token = access_token(&app, &email, "Password123").await;

        let response = app
            .router
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/admin/accounts",
                &json!({
                    "email": generate_unique_email(),
                    "password": "Password123",
                    "role": "admin"
                }),
                Some(&token),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}

#[tokio::test]
async fn test_admin_routes_require_authentication() {
    let app = setup_test_app().await;

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/admin/accounts/password-reset",
            &json!({ "email": ADMIN_EMAIL, "new_password": "Password123" }),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_reset_password() {
    let app = setup_test_app().await;
    let token = admin_token(&app).await;
    let email = generate_unique_email();
    create_test_account(&app, &email, "Password123", UserRole::Patient).await;

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/admin/accounts/password-reset",
            &json!({ "email": email, "new_password": "ResetPass789" }),
            Some(&token),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    login(&app, &email, "ResetPass789").await;
}

#[tokio::test]
async fn test_reset_password_unknown_account() {
    let app = setup_test_app().await;
    let token = admin_token(&app).await;

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/admin/accounts/password-reset",
            &json!({ "email": "nobody@example.com", "new_password": "ResetPass789" }),
            Some(&token),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_account() {
    let app = setup_test_app().await;
    let token = admin_token(&app).await;
    let email = generate_unique_email();
    let account = create_test_account(&app, &email, "Password123", UserRole::Patient).await;
    let uri = format!("/api/admin/accounts/{}", account.id);

    let response = app
        .router
        .clone()
        .oneshot(empty_request("DELETE", &uri, Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .router
        .clone()
        .oneshot(empty_request("DELETE", &uri, Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

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
async fn test_admin_cannot_delete_self() {
    let app = setup_test_app().await;
    let token = admin_token(&app).await;

    let response = app
        .router
        .clone()
        .oneshot(empty_request(
            "DELETE",
            &format!("/api/admin/accounts/{}", app.admin.id),
            Some(&token),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_set_email_verified() {
    let app = setup_test_app().await;
    let token = admin_token(&app).await;
    let account =
        create_test_account(&app, &generate_unique_email(), "Password123", UserRole::Doctor).await;
    assert!(!account.email_verified);

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/admin/accounts/{}/email-verified", account.id),
            &json!({ "verified": true }),
            Some(&token),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"], account.id.to_string());
    assert_eq!(body["email_verified"], true);
}
