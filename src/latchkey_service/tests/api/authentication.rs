use serde_json::{Value, json};

use crate::helpers::{PASSWORD, TestApp, get_random_email};

#[tokio::test]
async fn sign_in_issues_token_with_expiry() {
    let app = TestApp::new().await;
    let email = get_random_email();
    app.register(&email).await;

    let response = app
        .post_authentication_token(&json!({ "email": email, "password": PASSWORD }))
        .await;

    assert_eq!(response.status().as_u16(), 201);
    let body: Value = response.json().await.unwrap();
    let token = body["authentication_token"]["token"].as_str().unwrap();
    assert_eq!(token.len(), 26);
    let expiry = body["authentication_token"]["expiry"].as_str().unwrap();
    let expiry = chrono::DateTime::parse_from_rfc3339(expiry).unwrap();
    assert!(expiry > chrono::Utc::now());
}

#[tokio::test]
async fn bad_credentials_are_indistinguishable() {
    let app = TestApp::new().await;
    let email = get_random_email();
    app.register(&email).await;

    let wrong_password = app
        .post_authentication_token(&json!({ "email": email, "password": "wrong password" }))
        .await;
    let unknown_email = app
        .post_authentication_token(&json!({ "email": get_random_email(), "password": PASSWORD }))
        .await;

    assert_eq!(wrong_password.status().as_u16(), 401);
    assert_eq!(unknown_email.status().as_u16(), 401);
    assert_eq!(
        wrong_password.bytes().await.unwrap(),
        unknown_email.bytes().await.unwrap()
    );
}

#[tokio::test]
async fn every_sign_in_gets_its_own_session() {
    let app = TestApp::new().await;
    let email = get_random_email();
    let first = app.signed_in(&email).await;

    let second = app.sign_in(&email, PASSWORD).await;

    assert_ne!(first, second);
    assert_eq!(app.get_current_user(Some(&first)).await.status().as_u16(), 200);
    assert_eq!(app.get_current_user(Some(&second)).await.status().as_u16(), 200);
}

#[tokio::test]
async fn sign_out_revokes_all_sessions() {
    let app = TestApp::new().await;
    let email = get_random_email();
    let first = app.signed_in(&email).await;
    let second = app.sign_in(&email, PASSWORD).await;

    let response = app.delete_authentication_tokens(&first).await;

    assert_eq!(response.status().as_u16(), 204);
    assert_eq!(app.get_current_user(Some(&first)).await.status().as_u16(), 401);
    assert_eq!(app.get_current_user(Some(&second)).await.status().as_u16(), 401);
}
