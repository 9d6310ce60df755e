mod common;

use axum::http::{Method, StatusCode, header};
use serde_json::json;

use common::{admin_token, create_user, get, json_request, login, send, token_for};
use task_manager_api::{
    auth::jwt::{encode_token, make_claims},
    auth::{Claims, JwtKeys},
    routes::app,
    test_helpers::{TEST_SECRET, test_app, test_config, test_state_with},
};

#[tokio::test]
async fn superuser_can_log_in_and_read_itself() {
    let (app, _state) = test_app().await.expect("test app");

    let response = login(&app, "admin", "adminpassword").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["token_type"], "bearer");
    let token = response.body["access_token"].as_str().expect("token");

    let me = send(&app, get("/users/me/", token)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["username"], "admin");
    assert_eq!(me.body["isadmin"], true);
    assert!(me.body.get("password_hash").is_none());
}

#[tokio::test]
async fn wrong_password_and_unknown_user_fail_alike() {
    let (app, _state) = test_app().await.expect("test app");

    let wrong = login(&app, "admin", "not-the-password").await;
    let unknown = login(&app, "nobody", "adminpassword").await;

    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.body, unknown.body);
    assert_eq!(wrong.body["detail"], "Incorrect username or password");
}

#[tokio::test]
async fn missing_token_gets_a_bearer_challenge() {
    let (app, _state) = test_app().await.expect("test app");

    let response = send(&app, json_request(Method::GET, "/tasks/", None, None)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        response
            .headers
            .get(header::WWW_AUTHENTICATE)
            .map(|value| value.as_bytes()),
        Some(&b"Bearer"[..])
    );
    assert!(response.body["detail"].is_string());
}

#[tokio::test]
async fn expired_and_forged_tokens_are_rejected() {
    let (app, _state) = test_app().await.expect("test app");

    let expired = encode_token(
        &JwtKeys::from_secret(TEST_SECRET.as_bytes()),
        &Claims {
            sub: "admin".to_string(),
            iat: 1,
            exp: 2,
        },
    )
    .expect("encode");
    let forged = encode_token(
        &JwtKeys::from_secret(b"someone-elses-secret"),
        &make_claims("admin", std::time::Duration::from_secs(600)),
    )
    .expect("encode");

    for token in [expired, forged] {
        let response = send(&app, get("/users/me/", &token)).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.body["detail"], "Could not validate credentials");
    }
}

#[tokio::test]
async fn token_for_unknown_subject_is_unauthorized() {
    let (app, _state) = test_app().await.expect("test app");
    let token = encode_token(
        &JwtKeys::from_secret(TEST_SECRET.as_bytes()),
        &make_claims("ghost", std::time::Duration::from_secs(600)),
    )
    .expect("encode");

    let response = send(&app, get("/users/me/", &token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn regular_user_cannot_list_users() {
    let (app, _state) = test_app().await.expect("test app");
    let admin = admin_token(&app).await;
    create_user(&app, &admin, "carol", "carol-password").await;
    let carol = token_for(&app, "carol", "carol-password").await;

    let response = send(&app, get("/users/", &carol)).await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["detail"], "Not enough permissions");
}

#[tokio::test]
async fn disabled_account_is_rejected_with_400() {
    let (app, _state) = test_app().await.expect("test app");
    let admin = admin_token(&app).await;
    let id = create_user(&app, &admin, "dave", "dave-password").await;
    // Log in while still enabled; the token stays valid after disabling.
    let dave = token_for(&app, "dave", "dave-password").await;

    let disable = send(
        &app,
        json_request(
            Method::PATCH,
            &format!("/users/{id}"),
            Some(&admin),
            Some(json!({ "enabled": false })),
        ),
    )
    .await;
    assert_eq!(disable.status, StatusCode::OK);

    let response = send(&app, get("/tasks/", &dave)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["detail"], "Inactive user");
}

#[tokio::test]
async fn admission_control_answers_429_with_retry_after() {
    let mut cfg = test_config();
    cfg.rate_limit.requests_per_minute = 2;
    let state = test_state_with(cfg).await.expect("test state");
    let app = app(state);

    for _ in 0..2 {
        let response = login(&app, "admin", "wrong-password").await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    }

    let limited = login(&app, "admin", "adminpassword").await;
    assert_eq!(limited.status, StatusCode::TOO_MANY_REQUESTS);
    let retry_after: u64 = limited
        .headers
        .get(header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
        .expect("Retry-After header");
    assert!((1..=60).contains(&retry_after));

    // Other routes have their own budget.
    let other = send(&app, json_request(Method::GET, "/tasks/", None, None)).await;
    assert_eq!(other.status, StatusCode::UNAUTHORIZED);
}
