pub mod constants;
pub mod settings;

pub use constants::*;
pub use settings::{
    AllowedOrigins, ApplicationSettings, AuthServiceSetting, EmailClientSettings,
    PostgresSettings, TokenSettings,
};
