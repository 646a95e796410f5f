//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use anyhow::{Context, bail};
use attendance::{AttendanceConfig, PgAttendanceRepository, attendance_router};
use axum::{
    Router, http,
    http::{Method, header},
};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5002";
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:5000,http://127.0.0.1:5000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,attendance=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let config = load_attendance_config()?;
    tracing::info!(
        session_ttl_minutes = config.session_ttl_minutes(),
        "Attendance configuration loaded"
    );

    let attendance_store = PgAttendanceRepository::new(pool.clone());

    // CORS configuration
    let frontend_origins =
        env::var("FRONTEND_ORIGINS").unwrap_or_else(|_| DEFAULT_FRONTEND_ORIGINS.to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
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
        .nest(
            "/api/attendance",
            attendance_router(attendance_store, config),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let addr: SocketAddr = bind_addr
        .parse()
        .with_context(|| format!("Invalid BIND_ADDR: {bind_addr}"))?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the attendance config from the environment
fn load_attendance_config() -> anyhow::Result<AttendanceConfig> {
    let mut config = match env::var("ATTENDANCE_IDENTITY_SECRET") {
        Ok(secret_b64) => {
            let secret_bytes = platform::crypto::from_base64(&secret_b64)
                .context("ATTENDANCE_IDENTITY_SECRET is not valid base64")?;
            let secret: [u8; 32] = secret_bytes.as_slice().try_into().map_err(|_| {
                anyhow::anyhow!(
                    "ATTENDANCE_IDENTITY_SECRET must decode to 32 bytes, got {}",
                    secret_bytes.len()
                )
            })?;
            AttendanceConfig {
                identity_secret: secret,
                ..AttendanceConfig::default()
            }
        }
        Err(_) if cfg!(debug_assertions) => {
            tracing::warn!("ATTENDANCE_IDENTITY_SECRET not set, using a random development secret");
            AttendanceConfig::with_random_secret()
        }
        Err(_) => bail!("ATTENDANCE_IDENTITY_SECRET must be set in production"),
    };

    if let Ok(minutes) = env::var("SESSION_TTL_MINUTES") {
        let minutes: u64 = minutes
            .trim()
            .parse()
            .with_context(|| format!("Invalid SESSION_TTL_MINUTES: {minutes}"))?;
        if minutes == 0 || minutes.saturating_mul(60) > config.max_session_ttl.as_secs() {
            bail!(
                "SESSION_TTL_MINUTES must be between 1 and {}",
                config.max_session_ttl.as_secs() / 60
            );
        }
        config = config.with_session_ttl_minutes(minutes);
    }

    Ok(config)
}
