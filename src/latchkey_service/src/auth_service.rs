use std::{future::Future, time::Duration};

use axum::{
    Router,
    http::{
        HeaderValue, Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
        request,
    },
    routing::{get, post, put},
};
use latchkey_adapters::{
    config::{AllowedOrigins, defaults::REQUEST_TIMEOUT_MILLIS},
    http::routes::{
        SystemInfo, change_current_user_email, create_authentication_token,
        create_email_change_token, create_verification_token, delete_authentication_tokens,
        healthcheck, method_not_allowed, not_found, register_user, show_current_user,
    },
};
use latchkey_application::BackgroundTasks;
use latchkey_core::{AuthenticationTokenStore, EmailClient, UserStore, VerificationTokenStore};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::telemetry::{make_span_with_request_id, on_request, on_response};

/// The account service: signup, registration, sessions and email changes
pub struct AuthService {
    router: Router,
    request_timeout: Duration,
}

impl AuthService {
    /// Create a new AuthService over the provided stores and email client
    ///
    /// # Arguments
    /// * `user_store` - Store for user accounts
    /// * `verification_store` - Store for signup and change-email tokens
    /// * `authentication_store` - Store for bearer session tokens
    /// * `email_client` - Client that delivers verification tokens
    /// * `background` - Supervisor for mail sends that outlive their request
    /// * `system_info` - Reported by the healthcheck
    ///
    /// Stores are cheap to clone: each holds a pool or an `Arc`. Each route is
    /// given only the state it needs.
    pub fn new<U, V, A, E>(
        user_store: U,
        verification_store: V,
        authentication_store: A,
        email_client: E,
        background: BackgroundTasks,
        system_info: SystemInfo,
    ) -> Self
    where
        U: UserStore + Clone + 'static,
        V: VerificationTokenStore + Clone + 'static,
        A: AuthenticationTokenStore + Clone + 'static,
        E: EmailClient + Clone + 'static,
    {
        let router = Router::new()
            .route("/v1/healthcheck", get(healthcheck))
            .with_state(system_info)
            // Signup needs the user store to skip taken addresses
            .route(
                "/v1/tokens/verification",
                post(create_verification_token::<U, V, E>),
            )
            .with_state((
                user_store.clone(),
                verification_store.clone(),
                email_client.clone(),
                background.clone(),
            ))
            .route(
                "/v1/tokens/verification/email-change",
                post(create_email_change_token::<U, V, A, E>),
            )
            .with_state((
                user_store.clone(),
                verification_store.clone(),
                authentication_store.clone(),
                email_client,
                background,
            ))
            .route(
                "/v1/tokens/authentication",
                post(create_authentication_token::<U, A>)
                    .delete(delete_authentication_tokens::<U, A>),
            )
            .with_state((user_store.clone(), authentication_store.clone()))
            .route("/v1/users", post(register_user::<U, V>))
            .with_state((user_store.clone(), verification_store.clone()))
            .route("/v1/users/me", get(show_current_user::<A>))
            .with_state(authentication_store.clone())
            .route(
                "/v1/users/me/email",
                put(change_current_user_email::<U, V, A>),
            )
            .with_state((user_store, verification_store, authentication_store))
            .fallback(not_found)
            .method_not_allowed_fallback(method_not_allowed);

        Self {
            router,
            request_timeout: Duration::from_millis(REQUEST_TIMEOUT_MILLIS),
        }
    }

    /// Bound on the time spent handling a single request
    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    fn with_trace_layer(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(make_span_with_request_id)
                .on_request(on_request)
                .on_response(on_response),
        );
        self
    }

    /// Convert the AuthService into a router that can be mounted on another router
    ///
    /// # Arguments
    /// * `allowed_origins` - Optional list of allowed CORS origins
    pub fn as_nested_router(mut self, allowed_origins: Option<AllowedOrigins>) -> Router {
        self.router = self.router.layer(TimeoutLayer::new(self.request_timeout));

        if let Some(allowed_origins) = allowed_origins {
            let cors = CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                .allow_origin(AllowOrigin::predicate(
                    move |origin: &HeaderValue, _request_parts: &request::Parts| {
                        allowed_origins.contains(origin)
                    },
                ));

            self.router = self.router.layer(cors);
        }
        self.with_trace_layer().router
    }

    /// Run the auth service as a standalone server until `shutdown` resolves
    ///
    /// In-flight requests are drained before this returns. Mail sends that
    /// are still running are not; await `BackgroundTasks::wait` for those.
    pub async fn run_standalone<F>(
        self,
        listener: TcpListener,
        allowed_origins: Option<AllowedOrigins>,
        shutdown: F,
    ) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = self.as_nested_router(allowed_origins);

        tracing::info!("Auth service listening on {}", listener.local_addr()?);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
    }
}
