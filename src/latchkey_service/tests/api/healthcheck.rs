use serde_json::Value;

use crate::helpers::TestApp;

#[tokio::test]
async fn healthcheck_reports_availability() {
    let app = TestApp::new().await;

    let response = app.get_healthcheck().await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "available");
    assert_eq!(body["system_info"]["environment"], "test");
    assert!(body["system_info"]["version"].is_string());
}
