use std::sync::Arc;

use auth::Authenticator;
use auth::SystemClock;
use auth_service::config::Config;
use auth_service::domain::identity::service::LoginService;
use auth_service::inbound::http::router::create_router;
use auth_service::outbound::repositories::PostgresCredentialStore;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_service=debug,auth=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "auth-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        token_ttl_minutes = config.jwt.expiration_minutes,
        token_leeway_seconds = config.jwt.leeway_seconds,
        argon2_memory_kib = config.password.memory_kib,
        argon2_iterations = config.password.iterations,
        legacy_bcrypt_cost = ?config.password.legacy_bcrypt_cost,
        "Configuration loaded"
    );

    // Bad signing or hashing material stops the process here.
    let authenticator = config
        .auth_settings()
        .and_then(|settings| Authenticator::new(&settings, Arc::new(SystemClock)))
        .map_err(|e| {
            tracing::error!(error = %e, "Invalid authentication configuration");
            e
        })?;
    let authenticator = Arc::new(authenticator);

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    let credential_store = Arc::new(PostgresCredentialStore::new(pg_pool));
    let login_service = Arc::new(LoginService::new(credential_store, authenticator));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(login_service);
    axum::serve(http_listener, http_application).await?;

    tracing::info!("Server exited");

    Ok(())
}
