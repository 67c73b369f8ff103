//! aidex - a self-hostable catalog and discovery API for AI tools.
//!
//! The service exposes a read-heavy public surface (browse, filter, search
//! tools; browse categories and use cases) plus a small authenticated admin
//! surface for adding catalog entries. Data lives in SQLite; sessions are
//! stateless JWTs carried in a cookie or a bearer header.
//!
//! ## Architecture
//!
//! - [`api`]: axum handlers and the request/response models they serialize
//! - [`db`]: repositories (one per entity) and their row models
//! - [`auth`]: password hashing, JWT sessions, and the request extractors
//! - [`config`]: YAML + environment configuration via figment
//!
//! ## Usage
//!
//! ```no_run
//! use aidex::{Application, Config};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::default();
//! let app = Application::new(config).await?;
//! app.serve(std::future::pending()).await
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod openapi;
pub mod telemetry;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

use crate::{
    api::models::users::Role,
    auth::password,
    db::handlers::{Categories, Repository, UseCases, Users},
    db::models::{categories::CategoryCreateDBRequest, use_cases::UseCaseCreateDBRequest, users::UserCreateDBRequest},
    openapi::ApiDoc,
};
use axum::http::HeaderValue;
use axum::{
    Router, http,
    routing::{get, post},
};
use bon::Builder;
pub use config::Config;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::str::FromStr;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{debug, info, instrument, Level};
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

pub use types::{CategoryId, ReviewId, ToolId, UseCaseId, UserId};

/// Application state shared across all request handlers.
///
/// # Example
///
/// ```ignore
/// let state = AppState::builder()
///     .db(pool)
///     .config(config)
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Config,
}

/// Get the aidex database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Create the initial admin user if it doesn't exist.
///
/// Idempotent: creates the admin account on first startup, or refreshes its
/// password on subsequent startups when `admin_password` is configured. This
/// keeps the instance recoverable when the password is lost.
pub async fn create_initial_admin_user(email: &str, password: Option<&str>, config: &Config, db: &SqlitePool) -> errors::Result<UserId> {
    let password_hash = password
        .map(|p| password::hash_string_with_params(p, Some(config.auth.password.argon2_params())))
        .transpose()?;

    let mut conn = db.acquire().await.map_err(|e| errors::Error::Database(e.into()))?;
    let mut users = Users::new(&mut conn);

    if let Some(existing) = users.get_user_by_email(email).await? {
        if let Some(hash) = password_hash {
            users.set_password_hash(existing.id, &hash).await?;
            debug!("Refreshed password for admin user {}", existing.id);
        }
        return Ok(existing.id);
    }

    let admin = users
        .create(&UserCreateDBRequest {
            email: email.to_string(),
            name: Some("Administrator".to_string()),
            image: None,
            role: Role::Admin,
            password_hash,
        })
        .await?;

    info!("Created initial admin user {} ({})", admin.id, email);
    Ok(admin.id)
}

/// Default taxonomy inserted on first startup.
const SEED_CATEGORIES: &[(&str, &str)] = &[
    ("writing", "Writing"),
    ("image-generation", "Image Generation"),
    ("code-assistants", "Code Assistants"),
    ("audio-voice", "Audio & Voice"),
    ("video", "Video"),
    ("productivity", "Productivity"),
    ("research", "Research"),
];

const SEED_USE_CASES: &[(&str, &str)] = &[
    ("content-creation", "Content Creation"),
    ("software-development", "Software Development"),
    ("marketing", "Marketing"),
    ("customer-support", "Customer Support"),
    ("data-analysis", "Data Analysis"),
    ("education", "Education"),
];

/// Seed the catalog taxonomy with default categories and use cases.
///
/// Runs at most once per database: a `system_config` flag records that
/// seeding happened, so manual edits to the taxonomy are never overwritten.
pub async fn seed_database(db: &SqlitePool) -> Result<(), anyhow::Error> {
    // Use a transaction to ensure atomicity
    let mut tx = db.begin().await?;

    let seeded = sqlx::query_scalar::<_, i64>("SELECT value FROM system_config WHERE key = 'catalog_seeded'")
        .fetch_optional(&mut *tx)
        .await?;

    if seeded == Some(1) {
        info!("Database already seeded, skipping seeding operations");
        tx.commit().await?;
        return Ok(());
    }

    info!("Seeding database with default categories and use cases");

    {
        let mut categories = Categories::new(&mut tx);
        for (slug, name) in SEED_CATEGORIES {
            categories
                .create(&CategoryCreateDBRequest {
                    slug: slug.to_string(),
                    name: name.to_string(),
                    description: None,
                })
                .await?;
        }
    }

    {
        let mut use_cases = UseCases::new(&mut tx);
        for (slug, name) in SEED_USE_CASES {
            use_cases
                .create(&UseCaseCreateDBRequest {
                    slug: slug.to_string(),
                    name: name.to_string(),
                    description: None,
                })
                .await?;
        }
    }

    sqlx::query("UPDATE system_config SET value = 1 WHERE key = 'catalog_seeded'")
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

/// Connect to the database, run migrations, and initialize startup data.
async fn setup_database(config: &Config) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new().max_connections(5).connect_with(options).await?;

    migrator().run(&pool).await?;

    create_initial_admin_user(&config.admin_email, config.admin_password.as_deref(), config, &pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create initial admin user: {}", e))?;

    if config.seed_catalog {
        seed_database(&pool).await?;
    }

    Ok(pool)
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let allowed = &config.auth.security.cors.allowed_origins;
    // `AllowOrigin::list` panics on a literal `*`; tower-http requires
    // `AllowOrigin::any()` for the wildcard case.
    let allow_origin = if allowed.iter().any(|o| matches!(o, config::CorsOrigin::Wildcard)) {
        AllowOrigin::any()
    } else {
        let mut origins = Vec::new();
        for origin in allowed {
            let header_value = match origin {
                config::CorsOrigin::Wildcard => unreachable!(),
                config::CorsOrigin::Url(url) => url.as_str().parse::<HeaderValue>()?,
            };
            origins.push(header_value);
        }
        AllowOrigin::list(origins)
    };

    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(config.auth.security.cors.allow_credentials)
        .allow_headers([http::header::AUTHORIZATION, http::header::CONTENT_TYPE])
        .allow_methods([http::Method::GET, http::Method::POST]);

    Ok(cors)
}

/// Build the main application router with all endpoints and middleware.
///
/// - Public catalog routes under `/api/v1`
/// - Session routes under `/authentication`
/// - Interactive API docs at `/docs`
/// - CORS and tracing middleware
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let catalog_routes = Router::new()
        .route("/tools", get(api::handlers::tools::list_tools).post(api::handlers::tools::create_tool))
        .route("/tools/filtered", get(api::handlers::tools::filtered_tools))
        .route("/tools/featured", get(api::handlers::tools::featured_tools))
        .route("/tools/search", get(api::handlers::tools::search_tools))
        .route("/tools/{slug}", get(api::handlers::tools::get_tool))
        .route(
            "/categories",
            get(api::handlers::categories::list_categories).post(api::handlers::categories::create_category),
        )
        .route("/categories/{slug}", get(api::handlers::categories::get_category))
        .route(
            "/use-cases",
            get(api::handlers::use_cases::list_use_cases).post(api::handlers::use_cases::create_use_case),
        )
        .route("/use-cases/{slug}", get(api::handlers::use_cases::get_use_case));

    let auth_routes = Router::new()
        .route("/authentication/login", post(api::handlers::auth::login))
        .route("/authentication/logout", post(api::handlers::auth::logout))
        .route("/authentication/me", get(api::handlers::auth::me));

    let cors_layer = create_cors_layer(&state.config)?;

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .nest("/api/v1", catalog_routes)
        .merge(auth_routes)
        .with_state(state)
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/docs"))
        .layer(cors_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    Ok(router)
}

/// A fully initialized application, ready to serve.
///
/// # Lifecycle
///
/// 1. **Create**: [`Application::new`] connects to the database, runs
///    migrations, provisions the admin user, and seeds the taxonomy
/// 2. **Serve**: [`Application::serve`] binds a TCP port and handles requests
///    until the shutdown future resolves
pub struct Application {
    router: Router,
    config: Config,
    pool: SqlitePool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting aidex with configuration: {:#?}", config);

        let pool = setup_database(&config).await?;

        let state = AppState::builder().db(pool.clone()).config(config.clone()).build();
        let router = build_router(state)?;

        Ok(Self { router, config, pool })
    }

    /// The application's connection pool (used by tests to inspect state).
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router.into_make_service()).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("aidex listening on http://{}", bind_addr);

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod test;
