//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; handlers return their crate's error
//! type, which converts into `kernel::error::AppError`.

mod config;

use access::domain::repository::PinRepository;
use access::{AccessConfig, InMemoryAccessRepository, PgAccessRepository, access_router};
use admin::{AdminConfig, admin_router};
use axum::{
    Router, http,
    http::{Method, header},
};
use learning::{CourseCatalog, LearningConfig, learning_router};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Settings;

/// Everything mounted under `/api`, for one PIN store implementation
fn api_router<R>(
    pins: R,
    catalog: CourseCatalog,
    access_config: AccessConfig,
    learning_config: LearningConfig,
    admin_config: Option<AdminConfig>,
) -> Router
where
    R: PinRepository + Clone + Send + Sync + 'static,
{
    let mut api = access_router(pins.clone(), access_config.clone()).merge(
        learning_router(catalog, learning_config, pins.clone(), access_config.clone()),
    );

    match admin_config {
        Some(admin_config) => {
            api = api.merge(admin_router(pins, admin_config, access_config));
        }
        None => tracing::warn!("Admin PINs not configured, admin routes disabled"),
    }

    api
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,access=info,learning=info,admin=info,platform=info,tower_http=info"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env()?;

    // Course catalog
    let catalog = match &settings.catalog_path {
        Some(path) => CourseCatalog::from_json_file(path)?,
        None => CourseCatalog::builtin()?,
    };
    tracing::info!(courses = catalog.courses().len(), "Course catalog loaded");

    // Configuration
    let base_access = if cfg!(debug_assertions) {
        AccessConfig::development()
    } else {
        AccessConfig::default()
    };
    let mut access_config = AccessConfig {
        grant_secret: settings.access_grant_secret,
        pin_secret: settings.pin_secret,
        ..base_access
    };
    access_config.validate_rate_limit = access_config
        .validate_rate_limit
        .trusting_forwarded_for(settings.trust_forwarded_for);

    let learning_config = LearningConfig {
        certificate_secret: settings.certificate_secret,
        ..LearningConfig::default()
    };

    let admin_config = settings.admin_pins.map(|pins| {
        let config = AdminConfig::new(pins.pin1, pins.pin2, settings.admin_token_secret);
        AdminConfig {
            auth_rate_limit: config
                .auth_rate_limit
                .trusting_forwarded_for(settings.trust_forwarded_for),
            ..config
        }
    });

    if settings.trust_forwarded_for {
        tracing::info!("Rate limits keyed on X-Forwarded-For");
    }

    // PIN storage
    let api = match &settings.database_url {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await?;

            tracing::info!("Connected to database");

            // Run migrations
            sqlx::migrate!("../../../database/migrations")
                .run(&pool)
                .await?;

            tracing::info!("Migrations completed");

            let pins = PgAccessRepository::new(pool);

            // Startup cleanup: remove expired PINs
            // Errors here should not prevent server startup
            match pins.cleanup_expired(chrono::Utc::now()).await {
                Ok(deleted) => {
                    tracing::info!(pins_deleted = deleted, "Expired PIN cleanup completed");
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "Expired PIN cleanup failed, continuing anyway"
                    );
                }
            }

            api_router(pins, catalog, access_config, learning_config, admin_config)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, PINs are kept in memory");
            api_router(
                InMemoryAccessRepository::new(),
                catalog,
                access_config,
                learning_config,
                admin_config,
            )
        }
    };

    // CORS configuration
    let allowed_origins: Vec<http::HeaderValue> = settings
        .frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = settings.bind_addr;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await?;

    Ok(())
}
