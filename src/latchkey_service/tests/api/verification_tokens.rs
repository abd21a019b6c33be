use latchkey_adapters::http::routes::VERIFICATION_SENT_MESSAGE;
use serde_json::{Value, json};

use crate::helpers::{TestApp, get_random_email};

#[tokio::test]
async fn signup_mails_a_registration_token() {
    let app = TestApp::new().await;
    let email = get_random_email();

    let response = app.post_verification_token(&json!({ "email": email })).await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], VERIFICATION_SENT_MESSAGE);

    let token = app.mailed_token(&email).await.expect("No mail was sent");
    assert_eq!(token.len(), 26);
    assert_eq!(app.verification_tokens.len().await, 1);
}

#[tokio::test]
async fn signup_responses_do_not_reveal_account_state() {
    let app = TestApp::new().await;
    let registered = get_random_email();
    app.register(&registered).await;
    let pending = get_random_email();
    app.post_verification_token(&json!({ "email": pending })).await;
    app.background.wait().await;
    let sent_before = app.mailer.sent().len();

    let mut bodies = Vec::new();
    for email in [get_random_email(), pending.clone(), registered.clone()] {
        let response = app.post_verification_token(&json!({ "email": email })).await;
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
async fn signup_normalizes_the_address() {
    let app = TestApp::new().await;

    app.post_verification_token(&json!({ "email": "  Someone@Example.COM " }))
        .await;
    let second = app
        .post_verification_token(&json!({ "email": "someone@example.com" }))
        .await;

    assert_eq!(second.status().as_u16(), 200);
    assert_eq!(app.verification_tokens.len().await, 1);
}

#[tokio::test]
async fn signup_rejects_malformed_email() {
    let app = TestApp::new().await;

    let test_cases = [json!({ "email": "" }), json!({ "email": "not-an-email" })];

    for body in test_cases {
        let response = app.post_verification_token(&body).await;
        assert_eq!(
            response.status().as_u16(),
            422,
            "Failed for input: {:?}",
            body
        );
    }
    assert!(app.verification_tokens.is_empty().await);
}
