use axum::{Json, extract::State, response::IntoResponse};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SystemInfo {
    pub environment: String,
    pub version: &'static str,
}

impl SystemInfo {
    pub fn new(environment: impl Into<String>) -> Self {
        Self {
            environment: environment.into(),
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    system_info: SystemInfo,
}

pub async fn healthcheck(State(system_info): State<SystemInfo>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "available",
        system_info,
    })
}
