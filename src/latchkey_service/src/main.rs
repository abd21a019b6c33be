use color_eyre::eyre::Result;
use latchkey_adapters::{
    config::AuthServiceSetting,
    email::PostmarkEmailClient,
    http::routes::SystemInfo,
    persistence::{
        PostgresAuthenticationTokenStore, PostgresUserStore, PostgresVerificationTokenStore,
    },
};
use latchkey_application::BackgroundTasks;
use latchkey_core::Email;
use latchkey_service::{AuthService, configure_postgresql, init_tracing};
use reqwest::Client as HttpClient;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing()?;

    // Load configuration
    let config = AuthServiceSetting::load()?;

    // Setup database connection pool and run migrations
    let pg_pool = configure_postgresql(&config.postgres).await?;
    let query_timeout = config.postgres.query_timeout();

    // Create stores
    let user_store = PostgresUserStore::new(pg_pool.clone()).with_query_timeout(query_timeout);
    let verification_store =
        PostgresVerificationTokenStore::new(pg_pool.clone(), config.tokens.verification_ttl())
            .with_query_timeout(query_timeout);
    let authentication_store =
        PostgresAuthenticationTokenStore::new(pg_pool, config.tokens.authentication_ttl())
            .with_query_timeout(query_timeout);

    // Create email client
    let http_client = HttpClient::builder()
        .timeout(config.email_client.timeout())
        .build()?;

    let email_client = PostmarkEmailClient::new(
        config.email_client.base_url.clone(),
        Email::parse(&config.email_client.sender)?,
        config.email_client.auth_token.clone(),
        http_client,
    )
    .with_token_ttl_hours(config.tokens.verification_ttl_hours);

    let background = BackgroundTasks::new();
    let auth_service = AuthService::new(
        user_store,
        verification_store,
        authentication_store,
        email_client,
        background.clone(),
        SystemInfo::new(config.application.environment.clone()),
    )
    .with_request_timeout(config.application.request_timeout());

    let allowed_origins =
        (!config.allowed_origins.is_empty()).then(|| config.allowed_origins.clone());

    let listener = TcpListener::bind(&config.application.address).await?;
    auth_service
        .run_standalone(listener, allowed_origins, shutdown_signal())
        .await?;

    tracing::info!(
        pending = background.pending(),
        "waiting for background tasks to finish"
    );
    background.wait().await;
    tracing::info!("stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
