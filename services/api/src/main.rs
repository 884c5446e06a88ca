use anyhow::Result;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use api::rate_limiter::{RateLimiter, RateLimiterConfig};
use api::repositories::{PlayerProfileRepository, UserRepository};
use api::routes;
use api::session::SessionStore;
use api::state::AppState;
use common::{cache, database};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Scoutbase API");

    // Initialize database connection pool
    let db_config = database::DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    // A backend without its store is useless; fail hard at startup.
    if !database::health_check(&pool).await? {
        anyhow::bail!("database is unreachable");
    }
    info!("Database connection successful");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(common::error::InfraError::Migration)?;
    info!("Migrations applied");

    // Initialize the session store
    let redis_config = cache::RedisConfig::from_env()?;
    let redis = cache::RedisPool::new(&redis_config).await?;

    let session_ttl = std::env::var("SESSION_TTL_SECONDS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(86_400);

    let state = AppState {
        db_pool: pool.clone(),
        users: UserRepository::new(pool.clone()),
        profiles: PlayerProfileRepository::new(pool),
        sessions: SessionStore::new(redis, session_ttl),
        login_limiter: RateLimiter::new(RateLimiterConfig::default()),
    };

    let app = routes::create_router(state);

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = TcpListener::bind(&bind_addr).await?;
    info!("Scoutbase API listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
