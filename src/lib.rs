//! # Latchkey - Email-verified account service
//!
//! This is a facade crate that re-exports the public APIs of the service
//! components. Use it to get access to everything in one place.
//!
//! ## Usage
//!
//! Add to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! latchkey = { path = "../latchkey" }
//! ```
//!
//! ## Structure
//!
//! - **Core domain types**: `Email`, `Password`, `Token`, `User`, etc.
//! - **Repository traits**: `UserStore`, `VerificationTokenStore`, `AuthenticationTokenStore`
//! - **Use cases**: `RequestRegistrationUseCase`, `RegisterUseCase`, etc.
//! - **Adapters**: `PostgresUserStore`, `PostmarkEmailClient`, etc.
//! - **Service**: `AuthService` - The main entry point

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types and value objects
pub mod core {
    pub use latchkey_core::*;
}

// Re-export most commonly used core types at the root level
pub use latchkey_core::{
    Email, EmailError, Notification, Password, PasswordError, Token, TokenScope, User, UserId,
};

// ============================================================================
// Repository Traits (Ports)
// ============================================================================

/// Repository trait definitions
pub mod repositories {
    pub use latchkey_core::{
        AuthenticationTokenStore, AuthenticationTokenStoreError, UserStore, UserStoreError,
        VerificationTokenStore, VerificationTokenStoreError,
    };
}

// Re-export repository traits at root level
pub use latchkey_core::{
    AuthenticationTokenStore, AuthenticationTokenStoreError, EmailClient, UserStore,
    UserStoreError, VerificationTokenStore, VerificationTokenStoreError,
};

// ============================================================================
// Use Cases (Application Layer)
// ============================================================================

/// Application use cases
pub mod use_cases {
    pub use latchkey_application::*;
}

// Re-export use cases at root level
pub use latchkey_application::{
    AuthenticateUseCase, BackgroundTasks, ChangeEmailUseCase, LogoutUseCase, RegisterUseCase,
    RequestEmailChangeUseCase, RequestRegistrationUseCase, VerifyAuthenticationUseCase,
};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// HTTP route handlers
    pub mod http {
        pub use latchkey_adapters::http::*;
    }

    /// Persistence implementations
    pub mod persistence {
        pub use latchkey_adapters::persistence::*;
    }

    /// Email client implementations
    pub mod email {
        pub use latchkey_adapters::email::*;
    }

    /// Configuration
    pub mod config {
        pub use latchkey_adapters::config::*;
    }
}

// Re-export commonly used adapters at root level
pub use latchkey_adapters::{
    email::{PostmarkEmailClient, RecordingEmailClient},
    persistence::{
        HashMapAuthenticationTokenStore, HashMapUserStore, HashMapVerificationTokenStore,
        PostgresAuthenticationTokenStore, PostgresUserStore, PostgresVerificationTokenStore,
    },
};

// ============================================================================
// Auth Service (Main Entry Point)
// ============================================================================

/// Main auth service
pub use latchkey_service::{AuthService, configure_postgresql, get_postgres_pool, init_tracing};

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing repository traits
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};

pub use http;
