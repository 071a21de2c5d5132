use std::sync::Arc;

use auth::TokenService;
use iam_service::config::Config;
use iam_service::domain::role::ports::RoleCommandServicePort;
use iam_service::domain::role::service::RoleService;
use iam_service::domain::user::ports::EmailSender;
use iam_service::domain::user::queries::UserQueryService;
use iam_service::domain::user::service::UserCommandService;
use iam_service::inbound::http::router::create_router;
use iam_service::inbound::http::router::AppState;
use iam_service::outbound::email::HttpEmailSender;
use iam_service::outbound::email::LogEmailSender;
use iam_service::outbound::repositories::PostgresRoleRepository;
use iam_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "iam_service=debug,auth=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "iam-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        public_base_url = %config.server.public_base_url,
        token_expiration_days = config.jwt.expiration_days,
        email_relay = config.email.relay_url.as_deref().unwrap_or("log-only"),
        "Configuration loaded"
    );

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

    let token_service = Arc::new(TokenService::new(
        config.jwt.secret.as_bytes(),
        config.jwt.expiration_days,
    )?);
    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let role_repository = Arc::new(PostgresRoleRepository::new(pg_pool));

    let role_service = Arc::new(RoleService::new(Arc::clone(&role_repository)));
    role_service.seed_roles().await?;

    let state = match &config.email.relay_url {
        Some(relay_url) => build_state(
            &config,
            user_repository,
            role_repository,
            role_service,
            token_service,
            HttpEmailSender::new(
                relay_url.as_str(),
                config.email.from.as_str(),
                config.email.subject.as_str(),
            ),
        ),
        None => build_state(
            &config,
            user_repository,
            role_repository,
            role_service,
            token_service,
            LogEmailSender::new(config.email.from.as_str()),
        ),
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, create_router(state)).await?;

    Ok(())
}

fn build_state<ES: EmailSender>(
    config: &Config,
    user_repository: Arc<PostgresUserRepository>,
    role_repository: Arc<PostgresRoleRepository>,
    role_service: Arc<RoleService<PostgresRoleRepository>>,
    token_service: Arc<TokenService>,
    email_sender: ES,
) -> AppState {
    let user_command_service = UserCommandService::new(
        Arc::clone(&user_repository),
        role_repository,
        Arc::new(email_sender),
        Arc::clone(&token_service),
    );
    let user_query_service = UserQueryService::new(user_repository);

    AppState {
        user_command_service: Arc::new(user_command_service),
        user_query_service: Arc::new(user_query_service),
        role_query_service: role_service,
        token_service,
        public_base_url: config.server.public_base_url.clone(),
    }
}
