use serde_json::{Value, json};

use crate::helpers::{PASSWORD, TestApp, get_random_email};

#[tokio::test]
async fn register_creates_user_and_consumes_token() {
    let app = TestApp::new().await;
    let email = get_random_email();

    let body = app.register(&email).await;

    assert_eq!(body["user"]["email"], email.to_lowercase());
    assert!(body["user"]["id"].is_i64());
    assert!(body["user"]["created_at"].is_string());
    assert!(body["user"].get("password_hash").is_none());
    assert!(app.verification_tokens.is_empty().await);
}

#[tokio::test]
async fn register_with_never_issued_token_is_unauthorized() {
    let app = TestApp::new().await;
    let email = get_random_email();
    app.post_verification_token(&json!({ "email": email })).await;

    let response = app
        .post_user(&json!({
            "email": email,
            "password": PASSWORD,
            "token": "AAAAAAAAAAAAAAAAAAAAAAAAAA",
        }))
        .await;

    assert_eq!(response.status().as_u16(), 401);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Unauthorized");
    assert_eq!(app.verification_tokens.len().await, 1);
}

#[tokio::test]
async fn register_token_cannot_be_replayed() {
    let app = TestApp::new().await;
    let email = get_random_email();
    app.post_verification_token(&json!({ "email": email })).await;
    let token = app.mailed_token(&email).await.unwrap();
    let body = json!({ "email": email, "password": PASSWORD, "token": token });

    let first = app.post_user(&body).await;
    let replay = app.post_user(&body).await;

    assert_eq!(first.status().as_u16(), 201);
    assert_eq!(replay.status().as_u16(), 401);
}

#[tokio::test]
async fn register_token_is_bound_to_its_address() {
    let app = TestApp::new().await;
    let email = get_random_email();
    app.post_verification_token(&json!({ "email": email })).await;
    let token = app.mailed_token(&email).await.unwrap();

    let response = app
        .post_user(&json!({
            "email": format!("other.{email}"),
            "password": PASSWORD,
            "token": token,
        }))
        .await;

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn register_rejects_invalid_input() {
    let app = TestApp::new().await;
    let email = get_random_email();

    let test_cases = [
        json!({ "email": email, "password": "short", "token": "AAAAAAAAAAAAAAAAAAAAAAAAAA" }),
        json!({ "email": email, "password": PASSWORD, "token": "not-a-token" }),
        json!({ "email": "nope", "password": PASSWORD, "token": "AAAAAAAAAAAAAAAAAAAAAAAAAA" }),
    ];

    for body in test_cases {
        let response = app.post_user(&body).await;
        assert_eq!(
            response.status().as_u16(),
            422,
            "Failed for input: {:?}",
            body
        );
    }
}

#[tokio::test]
async fn current_user_requires_bearer_token() {
    let app = TestApp::new().await;

    let missing = app.get_current_user(None).await;
    let unknown = app
        .get_current_user(Some("AAAAAAAAAAAAAAAAAAAAAAAAAA"))
        .await;

    for response in [missing, unknown] {
        assert_eq!(response.status().as_u16(), 401);
        assert_eq!(response.headers()["www-authenticate"], "Bearer");
    }
}

#[tokio::test]
async fn current_user_is_resolved_from_token() {
    let app = TestApp::new().await;
    let email = get_random_email();
    let token = app.signed_in(&email).await;

    let response = app.get_current_user(Some(&token)).await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["user"]["email"], email.to_lowercase());
}
