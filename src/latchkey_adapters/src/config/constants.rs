pub mod env {
    /// Selects `config/{environment}.json`.
    pub const APP_ENVIRONMENT_ENV_VAR: &str = "APP_ENVIRONMENT";
    /// Prefix of overriding variables, e.g. `LATCHKEY_POSTGRES__URL`.
    pub const ENV_PREFIX: &str = "LATCHKEY";
}

pub mod defaults {
    pub const ENVIRONMENT: &str = "development";
    pub const REQUEST_TIMEOUT_MILLIS: u64 = 10_000;
    pub const MAX_CONNECTIONS: u32 = 5;
    pub const QUERY_TIMEOUT_MILLIS: u64 = 3_000;
    pub const VERIFICATION_TTL_HOURS: i64 = 36;
    pub const AUTHENTICATION_TTL_HOURS: i64 = 24;
}

pub mod prod {
    pub const APP_ADDRESS: &str = "0.0.0.0:3000";
    pub mod email_client {
        pub const BASE_URL: &str = "https://api.postmarkapp.com/";
        pub const SENDER: &str = "no-reply@latchkey.dev";
        pub const TIMEOUT_MILLIS: u64 = 10_000;
    }
}

pub mod test {
    pub const APP_ADDRESS: &str = "127.0.0.1:0";
    pub mod email_client {
        use std::time::Duration;

        pub const SENDER: &str = "test@email.com";
        pub const TIMEOUT: Duration = std::time::Duration::from_millis(200);
    }
}
