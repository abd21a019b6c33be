use serde_json::{Value, json};

use crate::helpers::{PASSWORD, TestApp, get_random_email};

#[tokio::test]
async fn email_change_moves_account_and_ends_sessions() {
    let app = TestApp::new().await;
    let old_email = get_random_email();
    let new_email = format!("new.{}", get_random_email());
    let session = app.signed_in(&old_email).await;

    let response = app
        .post_email_change_token(Some(&session), &json!({ "email": new_email }))
        .await;
    assert_eq!(response.status().as_u16(), 200);
    let token = app
        .mailed_token(&new_email)
        .await
        .expect("No change-email mail was sent");

    let response = app
        .put_current_user_email(&session, &json!({ "email": new_email, "token": token }))
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["user"]["email"], new_email.to_lowercase());

    assert_eq!(app.get_current_user(Some(&session)).await.status().as_u16(), 401);
    let fresh = app.sign_in(&new_email, PASSWORD).await;
    assert_eq!(app.get_current_user(Some(&fresh)).await.status().as_u16(), 200);
}

#[tokio::test]
async fn email_change_request_requires_bearer_token() {
    let app = TestApp::new().await;

    let response = app
        .post_email_change_token(None, &json!({ "email": get_random_email() }))
        .await;

    assert_eq!(response.status().as_u16(), 401);
    assert!(app.verification_tokens.is_empty().await);
}

#[tokio::test]
async fn email_change_request_to_taken_address_looks_successful() {
    let app = TestApp::new().await;
    let taken = get_random_email();
    app.register(&taken).await;
    let session = app.signed_in(&get_random_email()).await;
    let sent_before = app.mailer.sent().len();

    let response = app
        .post_email_change_token(Some(&session), &json!({ "email": taken }))
        .await;
    app.background.wait().await;

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(app.mailer.sent().len(), sent_before);
}

#[tokio::test]
async fn email_change_responses_do_not_reveal_account_state() {
    let app = TestApp::new().await;
    let taken = get_random_email();
    app.register(&taken).await;
    let session = app.signed_in(&get_random_email()).await;
    let pending = format!("pending.{}", get_random_email());
    app.post_email_change_token(Some(&session), &json!({ "email": pending }))
        .await;
    app.background.wait().await;
    let sent_before = app.mailer.sent().len();

    let mut bodies = Vec::new();
    for email in [format!("fresh.{}", get_random_email()), pending, taken] {
        let response = app
            .post_email_change_token(Some(&session), &json!({ "email": email }))
            .await;
        assert_eq!(response.status().as_u16(), 200);
        bodies.push(response.bytes().await.unwrap());
    }
    app.background.wait().await;

    assert_eq!(bodies[0], bodies[1]);
    assert_eq!(bodies[1], bodies[2]);
    // Only the fresh address got a mail.
    assert_eq!(app.mailer.sent().len(), sent_before + 1);
}

#[tokio::test]
async fn email_change_token_is_bound_to_requesting_user() {
    let app = TestApp::new().await;
    let new_email = format!("new.{}", get_random_email());
    let alice = app.signed_in(&get_random_email()).await;
    let mallory = app.signed_in(&get_random_email()).await;

    app.post_email_change_token(Some(&alice), &json!({ "email": new_email }))
        .await;
    let token = app.mailed_token(&new_email).await.unwrap();

    let response = app
        .put_current_user_email(&mallory, &json!({ "email": new_email, "token": token }))
        .await;

    assert_eq!(response.status().as_u16(), 401);
    assert_eq!(app.verification_tokens.len().await, 1);
}
