//! Integration tests for signup, confirmation, login, refresh and reset.

use axum::body::Body;
use axum::http::header::WWW_AUTHENTICATE;
use axum::http::{Request, StatusCode};
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_signup_confirm_login_flow() {
    let app = TestApp::new();

    let created = app.signup("alice", "alice@example.com", "secret1").await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["username"], "alice");
    assert_eq!(created.body["email"], "alice@example.com");
    assert_eq!(created.body["roles"], "user");
    assert!(
        created.body["avatar"]
            .as_str()
            .unwrap()
            .starts_with("https://www.gravatar.com/avatar/")
    );
    assert!(created.body.get("password_hash").is_none());

    let duplicate = app.signup("alice", "alice@example.com", "secret1").await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);
    assert_eq!(duplicate.body["detail"], "Account already exists");

    let early = app.login("alice@example.com", "secret1").await;
    assert_eq!(early.status, StatusCode::UNAUTHORIZED);
    assert_eq!(early.body["detail"], "Email not confirmed");
    assert_eq!(early.headers[WWW_AUTHENTICATE], "Bearer");

    let confirm_path = app.confirmation_path("alice@example.com").await;
    let confirmed = app.request("GET", &confirm_path, None, None).await;
    assert_eq!(confirmed.status, StatusCode::OK);
    assert_eq!(confirmed.body["message"], "Email confirmed");

    let again = app.request("GET", &confirm_path, None, None).await;
    assert_eq!(again.status, StatusCode::OK);
    assert_eq!(again.body["message"], "Your email is already confirmed");

    let login = app.login("alice@example.com", "secret1").await;
    assert_eq!(login.status, StatusCode::OK);
    assert_eq!(login.body["token_type"], "bearer");
    let token = login.body["access_token"].as_str().unwrap();

    let contacts = app.request("GET", "/api/contacts/", None, Some(token)).await;
    assert_eq!(contacts.status, StatusCode::OK);
    assert_eq!(contacts.body, json!([]));
}

#[tokio::test]
async fn test_login_failures() {
    let app = TestApp::new();
    app.register("bob", "bob@example.com", "secret1").await;

    let wrong = app.login("bob@example.com", "nope-nope").await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.body["detail"], "Invalid password");

    let unknown = app.login("nobody@example.com", "secret1").await;
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.body["detail"], "Invalid email");
    assert_eq!(unknown.body["error"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn test_signup_validation() {
    let app = TestApp::new();

    let bad_email = app.signup("carol", "not-an-email", "secret1").await;
    assert_eq!(bad_email.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_email.body["error"], "INVALID");

    let short = app.signup("carol", "carol@example.com", "123").await;
    assert_eq!(short.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_bodies_use_error_shape() {
    let app = TestApp::new();

    let truncated = app
        .send(
            Request::builder()
                .method("POST")
                .uri("/api/auth/signup")
                .header("Content-Type", "application/json")
                .body(Body::from("{\"username\": \"carol\""))
                .unwrap(),
        )
        .await;
    assert_eq!(truncated.status, StatusCode::BAD_REQUEST);
    assert_eq!(truncated.body["error"], "INVALID");
    assert!(truncated.body["detail"].is_string());

    let missing_field = app
        .request(
            "POST",
            "/api/auth/signup",
            Some(json!({"username": "carol", "email": "carol@example.com"})),
            None,
        )
        .await;
    assert_eq!(missing_field.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing_field.body["error"], "INVALID");

    let no_password = app
        .form("/api/auth/login", &[("username", "carol@example.com")])
        .await;
    assert_eq!(no_password.status, StatusCode::BAD_REQUEST);
    assert_eq!(no_password.body["error"], "INVALID");

    let no_reset_password = app
        .form("/api/auth/reset-password/whatever", &[("other", "x")])
        .await;
    assert_eq!(no_reset_password.status, StatusCode::BAD_REQUEST);
    assert_eq!(no_reset_password.body["error"], "INVALID");
}

#[tokio::test]
async fn test_bad_confirmation_token() {
    let app = TestApp::new();
    let response = app
        .request("GET", "/api/auth/confirmed_email/garbage", None, None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["detail"], "Verification error");
}

#[tokio::test]
async fn test_bearer_is_required_and_purpose_checked() {
    let app = TestApp::new();
    app.register("dave", "dave@example.com", "secret1").await;

    let missing = app.request("GET", "/api/contacts/", None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.body["detail"], "Not authenticated");

    let email_token = app.tokens.issue_email_action("dave@example.com").unwrap();
    let wrong_purpose = app
        .request("GET", "/api/contacts/", None, Some(&email_token))
        .await;
    assert_eq!(wrong_purpose.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_purpose.body["detail"], "Could not validate credentials");

    let garbage = app
        .request("GET", "/api/contacts/", None, Some("not.a.jwt"))
        .await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_token_rotation() {
    let app = TestApp::new();
    app.register("erin", "erin@example.com", "secret1").await;

    let login = app.login("erin@example.com", "secret1").await;
    let access = login.body["access_token"].as_str().unwrap().to_string();
    let refresh = login.body["refresh_token"].as_str().unwrap().to_string();

    let as_access = app
        .request("GET", "/api/auth/refresh_token", None, Some(&access))
        .await;
    assert_eq!(as_access.status, StatusCode::UNAUTHORIZED);

    let login = app.login("erin@example.com", "secret1").await;
    let refresh_2 = login.body["refresh_token"].as_str().unwrap().to_string();

    // the first refresh token was replaced by the second login
    let stale = app
        .request("GET", "/api/auth/refresh_token", None, Some(&refresh))
        .await;
    assert_eq!(stale.status, StatusCode::UNAUTHORIZED);
    assert_eq!(stale.body["detail"], "Invalid refresh token");

    // reuse detection cleared the stored token
    let revoked = app
        .request("GET", "/api/auth/refresh_token", None, Some(&refresh_2))
        .await;
    assert_eq!(revoked.status, StatusCode::UNAUTHORIZED);

    let login = app.login("erin@example.com", "secret1").await;
    let access_3 = login.body["access_token"].as_str().unwrap().to_string();
    let refresh_3 = login.body["refresh_token"].as_str().unwrap().to_string();
    app.request("GET", "/api/users/me", None, Some(&access_3)).await;
    assert!(app.sessions.get("erin@example.com").await.unwrap().is_some());

    let rotated = app
        .request("GET", "/api/auth/refresh_token", None, Some(&refresh_3))
        .await;
    assert_eq!(rotated.status, StatusCode::OK);
    assert_eq!(rotated.body["token_type"], "bearer");
    assert_ne!(rotated.body["refresh_token"], refresh_3.as_str());
    assert!(app.sessions.get("erin@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn test_request_email_messages() {
    let app = TestApp::new();
    app.signup("fay", "fay@example.com", "secret1").await;

    let pending = app
        .request(
            "POST",
            "/api/auth/request_email",
            Some(json!({"email": "fay@example.com"})),
            None,
        )
        .await;
    assert_eq!(pending.status, StatusCode::OK);
    assert_eq!(pending.body["message"], "Check your email for confirmation.");

    let unknown = app
        .request(
            "POST",
            "/api/auth/request_email",
            Some(json!({"email": "ghost@example.com"})),
            None,
        )
        .await;
    assert_eq!(unknown.body["message"], "Check your email for confirmation.");

    let path = app.confirmation_path("fay@example.com").await;
    app.request("GET", &path, None, None).await;

    let done = app
        .request(
            "POST",
            "/api/auth/request_email",
            Some(json!({"email": "fay@example.com"})),
            None,
        )
        .await;
    assert_eq!(done.body["message"], "Your email is already confirmed");
}

#[tokio::test]
async fn test_forgot_and_reset_password() {
    let app = TestApp::new();
    let token = app.register("gus", "gus@example.com", "secret1").await;

    for email in ["gus@example.com", "ghost@example.com"] {
        let response = app
            .request(
                "POST",
                "/api/auth/forgot-password",
                Some(json!({"email": email})),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(
            response.body["message"],
            "If the email exists, a password reset link will be sent."
        );
    }

    let path = app.reset_path("gus@example.com").await;
    let page = app.request("GET", &path, None, None).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.text.contains("<form"));
    assert!(page.text.contains(&path));

    app.request("GET", "/api/users/me", None, Some(&token)).await;
    assert!(app.sessions.get("gus@example.com").await.unwrap().is_some());

    let reset = app.form(&path, &[("password", "brand-new")]).await;
    assert_eq!(reset.status, StatusCode::OK);
    assert_eq!(reset.body["message"], "Password reset successful");
    assert!(app.sessions.get("gus@example.com").await.unwrap().is_none());

    assert_eq!(
        app.login("gus@example.com", "secret1").await.status,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        app.login("gus@example.com", "brand-new").await.status,
        StatusCode::OK
    );

    let bad = app
        .form("/api/auth/reset-password/garbage", &[("password", "brand-new")])
        .await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad.body["detail"], "Invalid or expired token");

    let ghost_token = app.tokens.issue_email_action("ghost@example.com").unwrap();
    let ghost = app
        .form(
            &format!("/api/auth/reset-password/{ghost_token}"),
            &[("password", "brand-new")],
        )
        .await;
    assert_eq!(ghost.status, StatusCode::NOT_FOUND);
    assert_eq!(ghost.body["detail"], "User not found");
}
