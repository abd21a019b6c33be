use chrono::Duration;
use latchkey_adapters::{
    config::{defaults, test},
    email::RecordingEmailClient,
    http::routes::SystemInfo,
    persistence::{
        HashMapAuthenticationTokenStore, HashMapUserStore, HashMapVerificationTokenStore,
    },
};
use latchkey_application::BackgroundTasks;
use latchkey_core::Email;
use latchkey_service::AuthService;
use secrecy::ExposeSecret;
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub const PASSWORD: &str = "correct horse battery";

pub struct TestApp {
    pub address: String,
    pub http_client: reqwest::Client,
    pub verification_tokens: HashMapVerificationTokenStore,
    pub mailer: RecordingEmailClient,
    pub background: BackgroundTasks,
}

impl TestApp {
    pub async fn new() -> Self {
        let users = HashMapUserStore::new();
        let verification_tokens =
            HashMapVerificationTokenStore::new(Duration::hours(defaults::VERIFICATION_TTL_HOURS));
        let sessions = HashMapAuthenticationTokenStore::new(
            users.clone(),
            Duration::hours(defaults::AUTHENTICATION_TTL_HOURS),
        );
        let mailer = RecordingEmailClient::new();
        let background = BackgroundTasks::new();

        let service = AuthService::new(
            users.clone(),
            verification_tokens.clone(),
            sessions,
            mailer.clone(),
            background.clone(),
            SystemInfo::new("test"),
        );

        let listener = TcpListener::bind(test::APP_ADDRESS)
            .await
            .expect("Failed to bind test listener");
        let address = format!("http://{}", listener.local_addr().unwrap());

        tokio::spawn(service.run_standalone(listener, None, std::future::pending()));

        Self {
            address,
            http_client: reqwest::Client::new(),
            verification_tokens,
            mailer,
            background,
        }
    }

    pub async fn get_healthcheck(&self) -> reqwest::Response {
        self.http_client
            .get(format!("{}/v1/healthcheck", self.address))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_raw(&self, path: &str, body: &'static str) -> reqwest::Response {
        self.http_client
            .post(format!("{}{}", self.address, path))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_path(&self, path: &str) -> reqwest::Response {
        self.http_client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_verification_token(&self, body: &Value) -> reqwest::Response {
        self.http_client
            .post(format!("{}/v1/tokens/verification", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_email_change_token(
        &self,
        bearer: Option<&str>,
        body: &Value,
    ) -> reqwest::Response {
        let mut request = self
            .http_client
            .post(format!("{}/v1/tokens/verification/email-change", self.address))
            .json(body);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("Failed to execute request")
    }

    pub async fn post_authentication_token(&self, body: &Value) -> reqwest::Response {
        self.http_client
            .post(format!("{}/v1/tokens/authentication", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn delete_authentication_tokens(&self, bearer: &str) -> reqwest::Response {
        self.http_client
            .delete(format!("{}/v1/tokens/authentication", self.address))
            .bearer_auth(bearer)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_user(&self, body: &Value) -> reqwest::Response {
        self.http_client
            .post(format!("{}/v1/users", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_current_user(&self, bearer: Option<&str>) -> reqwest::Response {
        let mut request = self
            .http_client
            .get(format!("{}/v1/users/me", self.address));
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("Failed to execute request")
    }

    pub async fn put_current_user_email(&self, bearer: &str, body: &Value) -> reqwest::Response {
        self.http_client
            .put(format!("{}/v1/users/me/email", self.address))
            .bearer_auth(bearer)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Plaintext token of the last mail sent to `email`, once queued sends
    /// have finished.
    pub async fn mailed_token(&self, email: &str) -> Option<String> {
        self.background.wait().await;
        self.mailer
            .last_to(&Email::parse(email).unwrap())
            .map(|notification| notification.token().expose_secret().clone())
    }

    /// Sign up and register `email`, returning the created user's JSON.
    pub async fn register(&self, email: &str) -> Value {
        let response = self.post_verification_token(&json!({ "email": email })).await;
        assert_eq!(response.status().as_u16(), 200);
        let token = self
            .mailed_token(email)
            .await
            .expect("No registration mail was sent");

        let response = self
            .post_user(&json!({ "email": email, "password": PASSWORD, "token": token }))
            .await;
        assert_eq!(response.status().as_u16(), 201);
        response.json().await.unwrap()
    }

    /// Register `email` and sign in, returning the bearer token.
    pub async fn signed_in(&self, email: &str) -> String {
        self.register(email).await;
        self.sign_in(email, PASSWORD).await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> String {
        let response = self
            .post_authentication_token(&json!({ "email": email, "password": password }))
            .await;
        assert_eq!(response.status().as_u16(), 201);
        let body: Value = response.json().await.unwrap();
        body["authentication_token"]["token"]
            .as_str()
            .expect("Response carries no token")
            .to_string()
    }
}

pub fn get_random_email() -> String {
    use fake::{Fake, faker::internet::en::SafeEmail};
    SafeEmail().fake()
}
