//! Integration tests for the session store against live Redis
//!
//! Ignored by default; run with:
//!
//! ```text
//! REDIS_URL=... cargo test -p api -- --ignored
//! ```

use uuid::Uuid;

use api::models::Role;
use api::session::SessionStore;
use common::cache::{RedisConfig, RedisPool};

async fn store() -> SessionStore {
    let config = RedisConfig::from_env().unwrap();
    let redis = RedisPool::new(&config).await.expect("failed to open redis");
    SessionStore::new(redis, 60)
}

#[tokio::test]
#[ignore = "requires running Redis"]
async fn session_lifecycle_open_peek_revoke() {
    let store = store().await;
    let principal_id = Uuid::new_v4();

    let token = store.open(principal_id, Role::Scout).await.unwrap();
    assert!(store.is_valid(&token).await.unwrap());

    let record = store
        .peek(&token)
        .await
        .unwrap()
        .expect("freshly opened session must be live");
    assert_eq!(record.principal_id, principal_id);
    assert_eq!(record.role, Role::Scout);

    assert!(store.revoke(&token).await.unwrap());

    // the token cannot be replayed
    assert!(!store.is_valid(&token).await.unwrap());
    assert!(store.peek(&token).await.unwrap().is_none());
    assert!(!store.revoke(&token).await.unwrap());
}

#[tokio::test]
#[ignore = "requires running Redis"]
async fn unknown_tokens_are_simply_invalid() {
    let store = store().await;

    let token = Uuid::new_v4().to_string();
    assert!(!store.is_valid(&token).await.unwrap());
    assert!(store.peek(&token).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires running Redis"]
async fn sessions_are_independent() {
    let store = store().await;

    let first = store.open(Uuid::new_v4(), Role::Player).await.unwrap();
    let second = store.open(Uuid::new_v4(), Role::Club).await.unwrap();
    assert_ne!(first, second);

    store.revoke(&first).await.unwrap();
    assert!(store.is_valid(&second).await.unwrap());
}
