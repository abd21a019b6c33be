use serde_json::Value;

use crate::helpers::TestApp;

async fn error_of(response: reqwest::Response) -> String {
    let body: Value = response
        .json()
        .await
        .expect("Error body is not JSON");
    body["error"]
        .as_str()
        .expect("Error body carries no message")
        .to_string()
}

#[tokio::test]
async fn malformed_json_body_returns_error_envelope() {
    let app = TestApp::new().await;

    let response = app.post_raw("/v1/tokens/verification", "{not json").await;

    assert_eq!(response.status().as_u16(), 400);
    let error = error_of(response).await;
    assert_eq!(error, "body contains badly-formed JSON");
    assert!(app.verification_tokens.is_empty().await);
}

#[tokio::test]
async fn mistyped_json_field_is_unprocessable() {
    let app = TestApp::new().await;

    let response = app.post_raw("/v1/users", r#"{"email": 42}"#).await;

    assert_eq!(response.status().as_u16(), 422);
    assert_eq!(
        error_of(response).await,
        "body contains fields of the wrong type"
    );
}

#[tokio::test]
async fn unknown_route_returns_error_envelope() {
    let app = TestApp::new().await;

    let response = app.get_path("/v1/nope").await;

    assert_eq!(response.status().as_u16(), 404);
    assert_eq!(error_of(response).await, "Not Found");
}

#[tokio::test]
async fn wrong_method_returns_error_envelope() {
    let app = TestApp::new().await;

    let response = app.get_path("/v1/users").await;

    assert_eq!(response.status().as_u16(), 405);
    assert_eq!(error_of(response).await, "Method Not Allowed");
}
