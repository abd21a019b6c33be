use std::time::Duration;

use axum::http::HeaderValue;
use config::{Config, ConfigError, Environment, File};
use secrecy::Secret;
use serde::Deserialize;

use super::constants::{defaults, env, prod};

/// Service configuration.
///
/// Sources, later ones winning: built-in defaults, `config/base.json`,
/// `config/{APP_ENVIRONMENT}.json`, then `LATCHKEY_*` variables with `__`
/// between nested keys. A `.env` file is loaded into the process environment
/// first.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthServiceSetting {
    #[serde(default)]
    pub application: ApplicationSettings,
    pub postgres: PostgresSettings,
    #[serde(default)]
    pub tokens: TokenSettings,
    #[serde(default)]
    pub email_client: EmailClientSettings,
    #[serde(default)]
    pub allowed_origins: AllowedOrigins,
}

impl AuthServiceSetting {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = std::env::var(env::APP_ENVIRONMENT_ENV_VAR)
            .unwrap_or_else(|_| defaults::ENVIRONMENT.to_string());

        Config::builder()
            .set_default("application.environment", environment.as_str())?
            .add_source(File::with_name("config/base").required(false))
            .add_source(File::with_name(&format!("config/{environment}")).required(false))
            .add_source(
                Environment::with_prefix(env::ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("allowed_origins"),
            )
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationSettings {
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default = "default_environment")]
    pub environment: String,
    #[serde(default = "default_request_timeout_millis")]
    pub request_timeout_millis: u64,
}

impl ApplicationSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_millis)
    }
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        Self {
            address: default_address(),
            environment: default_environment(),
            request_timeout_millis: default_request_timeout_millis(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostgresSettings {
    pub url: Secret<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_query_timeout_millis")]
    pub query_timeout_millis: u64,
}

impl PostgresSettings {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_millis)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenSettings {
    #[serde(default = "default_verification_ttl_hours")]
    pub verification_ttl_hours: i64,
    #[serde(default = "default_authentication_ttl_hours")]
    pub authentication_ttl_hours: i64,
}

impl TokenSettings {
    pub fn verification_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.verification_ttl_hours)
    }

    pub fn authentication_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.authentication_ttl_hours)
    }
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            verification_ttl_hours: default_verification_ttl_hours(),
            authentication_ttl_hours: default_authentication_ttl_hours(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailClientSettings {
    #[serde(default = "default_email_base_url")]
    pub base_url: String,
    #[serde(default = "default_email_sender")]
    pub sender: String,
    #[serde(default = "default_email_auth_token")]
    pub auth_token: Secret<String>,
    #[serde(default = "default_email_timeout_millis")]
    pub timeout_millis: u64,
}

impl EmailClientSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_millis)
    }
}

impl Default for EmailClientSettings {
    fn default() -> Self {
        Self {
            base_url: default_email_base_url(),
            sender: default_email_sender(),
            auth_token: default_email_auth_token(),
            timeout_millis: default_email_timeout_millis(),
        }
    }
}

/// Origins allowed to make cross-origin calls. Empty disables CORS.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct AllowedOrigins(Vec<String>);

impl AllowedOrigins {
    pub fn new(origins: Vec<String>) -> Self {
        Self(origins)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, origin: &HeaderValue) -> bool {
        origin
            .to_str()
            .map(|origin| self.0.iter().any(|allowed| allowed == origin))
            .unwrap_or(false)
    }
}

fn default_address() -> String {
    prod::APP_ADDRESS.to_string()
}

fn default_environment() -> String {
    defaults::ENVIRONMENT.to_string()
}

fn default_request_timeout_millis() -> u64 {
    defaults::REQUEST_TIMEOUT_MILLIS
}

fn default_max_connections() -> u32 {
    defaults::MAX_CONNECTIONS
}

fn default_query_timeout_millis() -> u64 {
    defaults::QUERY_TIMEOUT_MILLIS
}

fn default_verification_ttl_hours() -> i64 {
    defaults::VERIFICATION_TTL_HOURS
}

fn default_authentication_ttl_hours() -> i64 {
    defaults::AUTHENTICATION_TTL_HOURS
}

fn default_email_base_url() -> String {
    prod::email_client::BASE_URL.to_string()
}

fn default_email_sender() -> String {
    prod::email_client::SENDER.to_string()
}

fn default_email_auth_token() -> Secret<String> {
    Secret::new(String::new())
}

fn default_email_timeout_millis() -> u64 {
    prod::email_client::TIMEOUT_MILLIS
}
