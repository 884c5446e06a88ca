//! Application state shared across handlers

use sqlx::PgPool;

use crate::rate_limiter::RateLimiter;
use crate::repositories::{PlayerProfileRepository, UserRepository};
use crate::session::SessionStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub users: UserRepository,
    pub profiles: PlayerProfileRepository,
    pub sessions: SessionStore,
    pub login_limiter: RateLimiter,
}
