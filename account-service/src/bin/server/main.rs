use std::sync::Arc;

use account_service::account::ports::AccountRepository;
use account_service::account::ports::NotificationSender;
use account_service::account::service::AccountService;
use account_service::config::Config;
use account_service::config::DatabaseBackend;
use account_service::config::LogFormat;
use account_service::inbound::http::cors::cors_layer;
use account_service::inbound::http::router::create_router;
use account_service::outbound::notifications::ChannelNotificationQueue;
use account_service::outbound::notifications::LogNotificationSender;
use account_service::outbound::notifications::SmtpNotificationSender;
use account_service::outbound::repositories::InMemoryAccountRepository;
use account_service::outbound::repositories::PostgresAccountRepository;
use auth::Authenticator;
use auth::TokenIssuer;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::load()?;
    init_tracing(config.logging.format);

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    tracing::info!(
        database_backend = ?config.database.backend,
        http_port = config.server.http_port,
        token_ttl_hours = config.jwt.expiration_hours,
        smtp_configured = config.smtp.is_some(),
        queue_capacity = config.notifications.queue_capacity,
        "Configuration loaded"
    );

    if config.has_weak_secret() {
        tracing::warn!(
            secret_bytes = config.jwt.secret.len(),
            recommended_bytes = account_service::config::RECOMMENDED_SECRET_BYTES,
            "JWT secret is shorter than recommended"
        );
    }

    let token_issuer = TokenIssuer::new(config.jwt.secret.as_bytes(), config.jwt.ttl()?)?;
    let authenticator = Arc::new(Authenticator::new(config.password.hasher()?, token_issuer));

    match config.database.backend {
        DatabaseBackend::Postgres => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .connect(&config.database.url)
                .await?;
            tracing::info!(
                max_connections = config.database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            let repository = Arc::new(PostgresAccountRepository::new(pg_pool));
            serve(config, repository, authenticator).await
        }
        DatabaseBackend::Memory => {
            tracing::warn!("Using in-memory account store, data is lost on restart");
            let repository = Arc::new(InMemoryAccountRepository::new());
            serve(config, repository, authenticator).await
        }
    }
}

async fn serve<AR: AccountRepository>(
    config: Config,
    repository: Arc<AR>,
    authenticator: Arc<Authenticator>,
) -> Result<(), anyhow::Error> {
    let capacity = config.notifications.queue_capacity;
    let notifications = match &config.smtp {
        Some(smtp) => {
            let sender = SmtpNotificationSender::new(smtp)?;
            spawn_notification_worker(capacity, Arc::new(sender))
        }
        None => {
            tracing::warn!("SMTP not configured, notifications will only be logged");
            spawn_notification_worker(capacity, Arc::new(LogNotificationSender))
        }
    };

    let gate = Arc::new(authenticator.gate());
    let account_service = Arc::new(AccountService::new(
        repository,
        notifications,
        authenticator,
    ));

    let http_application = create_router(account_service, gate, cors_layer(&config.cors)?);

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, http_application)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server exited successfully");
    Ok(())
}

fn spawn_notification_worker<NS: NotificationSender>(
    capacity: usize,
    sender: Arc<NS>,
) -> Arc<ChannelNotificationQueue> {
    let (queue, worker) = ChannelNotificationQueue::new(capacity, sender);
    tokio::spawn(worker.run());
    Arc::new(queue)
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "account_service=debug,notifications=info,tower_http=debug".into()
    });
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer().pretty()).init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
