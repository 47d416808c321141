//! Login, session, and refresh flow driven through the full router

mod common;

use axum::http::StatusCode;
use common::{TestApp, json_body};

#[tokio::test]
async fn test_login_session_refresh_flow() {
    let app = TestApp::new();
    app.register_user("jdoe", "hunter2").await;

    let token = app.login("jdoe", "hunter2").await;

    // The decoded claims are the safe profile projection
    let response = app.post_authed("/auth/session", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let claims = json_body(response).await;
    assert_eq!(claims["username"], "jdoe");
    assert_eq!(claims["email"], "jdoe@example.com");
    assert!(claims.get("password").is_none());

    // Refresh hands back a fresh token that also opens the session route
    let response = app.post_authed("/auth/refresh", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["token_type"], "bearer");
    let refreshed = body["access_token"].as_str().unwrap().to_string();

    let response = app.post_authed("/auth/session", &refreshed).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_token_shape() {
    let app = TestApp::new();
    app.register_user("jdoe", "hunter2").await;

    let response = app.post_form("/auth/login", "username=jdoe&password=hunter2").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["token_type"], "bearer");
    assert!(
        chrono::NaiveDateTime::parse_from_str(
            body["expires_on"].as_str().unwrap(),
            "%Y-%m-%d %H:%M:%S"
        )
        .is_ok()
    );
}

#[tokio::test]
async fn test_login_accepts_email_as_identifier() {
    let app = TestApp::new();
    app.register_user("jdoe", "hunter2").await;

    let response =
        app.post_form("/auth/login", "username=jdoe%40example.com&password=hunter2").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_unknown_account_is_404() {
    let app = TestApp::new();

    let response = app.post_form("/auth/login", "username=ghost&password=x").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["message"], "Account not found");
}

#[tokio::test]
async fn test_login_wrong_password_is_401() {
    let app = TestApp::new();
    app.register_user("jdoe", "hunter2").await;

    let response = app.post_form("/auth/login", "username=jdoe&password=wrong").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["message"], "Incorrect username or password");
}

#[tokio::test]
async fn test_session_requires_credentials() {
    let app = TestApp::new();

    let response = app.post_json("/auth/session", &serde_json::json!({})).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_session_rejects_non_bearer_scheme() {
    let app = TestApp::new();
    app.register_user("jdoe", "hunter2").await;
    let token = app.login("jdoe", "hunter2").await;

    // A valid token under the wrong scheme is still refused
    let response = app
        .request(
            axum::http::Request::builder()
                .method("POST")
                .uri("/auth/session")
                .header("authorization", format!("Basic {token}"))
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_body(response).await["message"], "Invalid authentication scheme.");
}

#[tokio::test]
async fn test_session_rejects_expired_token() {
    let app = TestApp::new();
    app.register_user("jdoe", "hunter2").await;

    let user = app.find_user("jdoe").await;
    let expired = app
        .codec
        .issue(user.safe_claims(), Some(chrono::Duration::minutes(-1)))
        .unwrap()
        .access_token;

    let response = app.post_authed("/auth/session", &expired).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_body(response).await["message"], "Invalid token or expired token.");
}
