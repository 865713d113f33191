mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::{Config, DatabaseConfig};
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::auth::clients::HostedAuthClient;
use crate::features::auth::{routes as auth_routes, AuthService, JwtValidator};
use crate::features::photos::{routes as photos_routes, PhotoService};
use crate::features::profiles::{routes as profiles_routes, ProfileService};
use crate::features::projects::{routes as projects_routes, ProjectService};
use crate::features::reports::{routes as reports_routes, ReportService};
use crate::features::tasks::{routes as tasks_routes, TaskService};
use crate::modules::storage::StorageClient;
use axum::extract::DefaultBodyLimit;
use axum::{middleware::from_fn, Router};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(Parser)]
#[command(name = "fieldsite-core", version, about = "Fieldsite API server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
    /// Run pending migrations and start the HTTP server (default)
    Serve,
    /// Apply pending migrations and exit
    Migrate,
    /// Print public schema tables with row estimates
    ListTables,
    /// Copy rows from the legacy `users` table into `profiles`
    MigrateLegacyUsers,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(
        cli.command.unwrap_or(Command::Serve),
        worker_threads,
    ))
}

async fn async_main(command: Command, worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match command {
        Command::Serve => serve(worker_threads).await,
        Command::Migrate => {
            let pool = connect_only().await?;
            database::run_migrations(&pool).await?;
            tracing::info!("Database migrations completed successfully");
            Ok(())
        }
        Command::ListTables => {
            let pool = connect_only().await?;
            let tables = database::list_tables(&pool).await?;
            if tables.is_empty() {
                println!("No tables in the public schema");
            }
            for table in tables {
                println!("{:<40} ~{} rows", table.table_name, table.estimated_rows);
            }
            Ok(())
        }
        Command::MigrateLegacyUsers => {
            let pool = connect_only().await?;
            ProfileService::new(pool)
                .migrate_legacy_users()
                .await
                .map_err(|e| anyhow::anyhow!("Legacy user migration failed: {}", e))?;
            Ok(())
        }
    }
}

/// Pool for maintenance commands, which only need `DATABASE_URL`
async fn connect_only() -> anyhow::Result<sqlx::PgPool> {
    let db_config = DatabaseConfig::from_env().map_err(|e| anyhow::anyhow!(e))?;
    Ok(database::create_pool(&db_config).await?)
}

async fn serve(worker_threads: usize) -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    // Log system info
    let available_cpus = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1);
    tracing::info!(
        "System info: available_cpus={}, tokio_worker_threads={}, pid={}",
        available_cpus,
        worker_threads,
        std::process::id()
    );

    tracing::info!("Configuration loaded successfully");

    // Create database connection pool
    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    // Run migrations automatically
    tracing::info!("Running database migrations...");
    database::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed successfully");

    // Bearer check is optional: without a secret the API stays open
    let jwt_validator = config.auth.jwt_secret.as_deref().map(|secret| {
        Arc::new(JwtValidator::new(
            secret,
            config.auth.audience.clone(),
            config.auth.jwt_leeway,
        ))
    });
    if jwt_validator.is_some() {
        tracing::info!("Bearer token check enabled for API routes");
    } else {
        tracing::warn!("AUTH_JWT_SECRET not set, API routes are open");
    }

    let profile_service = Arc::new(ProfileService::new(pool.clone()));
    tracing::info!("Profile service initialized");

    let project_service = Arc::new(ProjectService::new(pool.clone()));
    tracing::info!("Project service initialized");

    let report_service = Arc::new(ReportService::new(
        pool.clone(),
        Arc::clone(&project_service),
    ));
    tracing::info!("Report service initialized");

    // Initialize S3-compatible storage for photo uploads
    let storage_client = Arc::new(
        StorageClient::new(config.storage.clone())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to initialize storage client: {}", e))?,
    );
    tracing::info!(
        "Storage client initialized for bucket: {}",
        config.storage.bucket
    );

    let photo_service = Arc::new(PhotoService::new(
        pool.clone(),
        Arc::clone(&storage_client),
    ));
    tracing::info!("Photo service initialized");

    let task_service = Arc::new(TaskService::new(pool.clone()));
    tracing::info!("Task service initialized");

    // Hosted auth passthrough is only mounted when the backend is configured
    let auth_service = config.hosted_backend.clone().map(|hosted| {
        let client = Arc::new(HostedAuthClient::new(hosted));
        Arc::new(AuthService::new(client, Arc::clone(&profile_service)))
    });
    if auth_service.is_some() {
        tracing::info!("Hosted auth service initialized");
    } else {
        tracing::info!("Hosted backend not configured, auth routes disabled");
    }

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    // Build swagger router
    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    // API routes (bearer token required when a secret is configured)
    let api_routes = Router::new()
        .merge(profiles_routes::routes(Arc::clone(&profile_service)))
        .merge(projects_routes::routes(Arc::clone(&project_service)))
        .merge(reports_routes::routes(Arc::clone(&report_service)))
        .merge(photos_routes::routes(Arc::clone(&photo_service)))
        .merge(tasks_routes::routes(Arc::clone(&task_service)))
        .route_layer(axum::middleware::from_fn_with_state(
            jwt_validator,
            middleware::auth_middleware,
        ));

    // Simple health check endpoint (no auth required)
    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    // Public routes (no auth required)
    let mut public_routes = Router::new().merge(health_route);
    if let Some(auth_service) = auth_service {
        public_routes = public_routes.merge(auth_routes::routes(auth_service));
    }

    let app = Router::new()
        .merge(swagger)
        .merge(api_routes)
        .merge(public_routes)
        .layer(DefaultBodyLimit::max(config.app.max_request_body_size))
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    socket.set_recv_buffer_size(256 * 1024)?;
    socket.set_send_buffer_size(256 * 1024)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on {}", format!("http://{}", addr));
    tracing::info!(
        "Swagger UI available at {}",
        format!("http://{}/swagger-ui/", addr)
    );

    axum::serve(listener, app).await?;

    Ok(())
}
