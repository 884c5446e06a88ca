//! Session store and identity gate
//!
//! Server-side session state lives in Redis, one JSON record per opaque
//! token, expired by the store's TTL. Handlers never consult ambient state:
//! the middleware resolves the request's token into a [`SessionContext`]
//! value that is passed along explicitly and gates role-restricted
//! operations.

use chrono::{DateTime, Utc};
use common::cache::RedisPool;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::Role;

/// Server-side session state, keyed by opaque token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub principal_id: Uuid,
    pub role: Role,
    pub logged_in_at: DateTime<Utc>,
}

/// Redis-backed session store
#[derive(Clone)]
pub struct SessionStore {
    redis: RedisPool,
    ttl_seconds: u64,
}

impl SessionStore {
    /// Create a session store with the given record TTL
    pub fn new(redis: RedisPool, ttl_seconds: u64) -> Self {
        Self { redis, ttl_seconds }
    }

    /// Open a session for a verified principal, returning the opaque token.
    ///
    /// Callers have already verified credentials; opening never fails for
    /// domain reasons.
    pub async fn open(&self, principal_id: Uuid, role: Role) -> ApiResult<String> {
        let token = Uuid::new_v4().to_string();
        let record = SessionRecord {
            principal_id,
            role,
            logged_in_at: Utc::now(),
        };

        let payload = serde_json::to_string(&record)
            .map_err(|e| ApiError::Internal(format!("failed to serialize session: {e}")))?;

        self.redis
            .set(&session_key(&token), &payload, Some(self.ttl_seconds))
            .await?;

        info!("Opened session for principal {}", principal_id);
        Ok(token)
    }

    /// Look up the record behind a token, if the session is still live
    pub async fn peek(&self, token: &str) -> ApiResult<Option<SessionRecord>> {
        let Some(payload) = self.redis.get(&session_key(token)).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&payload) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                // An unreadable record is treated as no session at all.
                warn!("Discarding undecodable session record: {}", e);
                self.redis.delete(&session_key(token)).await?;
                Ok(None)
            }
        }
    }

    /// Invalidate a token so it cannot be replayed.
    /// Returns whether a live session was revoked.
    pub async fn revoke(&self, token: &str) -> ApiResult<bool> {
        let revoked = self.redis.delete(&session_key(token)).await?;
        if revoked {
            info!("Revoked session token");
        }
        Ok(revoked)
    }

    /// Whether a token still maps to a live session
    pub async fn is_valid(&self, token: &str) -> ApiResult<bool> {
        Ok(self.redis.exists(&session_key(token)).await?)
    }

    /// Whether the backing store is reachable
    pub async fn health_check(&self) -> ApiResult<bool> {
        Ok(self.redis.health_check().await?)
    }
}

fn session_key(token: &str) -> String {
    format!("session:{token}")
}

/// The request's resolved identity, passed explicitly to every operation
/// that needs one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionContext {
    Anonymous,
    Authenticated { principal_id: Uuid, role: Role },
}

impl SessionContext {
    /// Build a context from a live session record
    pub fn from_record(record: &SessionRecord) -> Self {
        SessionContext::Authenticated {
            principal_id: record.principal_id,
            role: record.role,
        }
    }

    /// Pass through when the principal holds one of `allowed`; signal
    /// `Unauthenticated` for anonymous requests and `Forbidden` for a role
    /// outside the allowed set.
    pub fn require_role(&self, allowed: &[Role]) -> ApiResult<(Uuid, Role)> {
        match self {
            SessionContext::Anonymous => Err(ApiError::Unauthenticated),
            SessionContext::Authenticated { principal_id, role } => {
                if allowed.contains(role) {
                    Ok((*principal_id, *role))
                } else {
                    Err(ApiError::Forbidden)
                }
            }
        }
    }

    /// Pass through for any signed-in principal
    pub fn require_authenticated(&self) -> ApiResult<(Uuid, Role)> {
        match self {
            SessionContext::Anonymous => Err(ApiError::Unauthenticated),
            SessionContext::Authenticated { principal_id, role } => Ok((*principal_id, *role)),
        }
    }

    /// Pass through when the principal is `subject` itself or an admin
    pub fn require_self_or_admin(&self, subject: Uuid) -> ApiResult<()> {
        let (principal_id, role) = self.require_authenticated()?;
        if principal_id == subject || role == Role::Admin {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }
}
