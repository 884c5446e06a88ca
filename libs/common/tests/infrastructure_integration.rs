//! Integration tests for the infrastructure components
//!
//! These tests need a running PostgreSQL and Redis and are therefore
//! ignored by default. Run them with:
//!
//! ```text
//! DATABASE_URL=... REDIS_URL=... cargo test -p common -- --ignored
//! ```

use common::{
    cache::{RedisConfig, RedisPool},
    database::{DatabaseConfig, health_check, init_pool},
};
use sqlx::Row;

#[tokio::test]
#[ignore = "requires running PostgreSQL and Redis"]
async fn infrastructure_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    assert!(health_check(&pool).await?, "database health check failed");

    let row = sqlx::query("SELECT 1 as result").fetch_one(&pool).await?;
    let result: i32 = row.get("result");
    assert_eq!(result, 1);

    let redis_config = RedisConfig::from_env()?;
    let redis_pool = RedisPool::new(&redis_config).await?;

    assert!(
        redis_pool.health_check().await?,
        "redis health check failed"
    );

    let key = "infra_test_key";
    redis_pool.set(key, "infra_test_value", Some(10)).await?;
    assert_eq!(
        redis_pool.get(key).await?,
        Some("infra_test_value".to_string())
    );
    assert!(redis_pool.exists(key).await?);

    assert!(redis_pool.delete(key).await?);
    assert_eq!(redis_pool.get(key).await?, None);
    assert!(!redis_pool.exists(key).await?);

    Ok(())
}
