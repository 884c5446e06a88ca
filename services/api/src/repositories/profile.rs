//! Player profile repository
//!
//! The profile row is created alongside its player Principal and removed by
//! cascade; this repository only reads and replaces it.

use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{PlayerProfile, PlayerProfileUpdate, PreferredFoot};

const PROFILE_COLUMNS: &str = "id, user_id, height, weight, preferred_foot, bio, video_url";

/// Player profile repository
#[derive(Clone)]
pub struct PlayerProfileRepository {
    pool: PgPool,
}

impl PlayerProfileRepository {
    /// Create a new player profile repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch the profile owned by a player Principal
    pub async fn find_by_user(&self, user_id: Uuid) -> ApiResult<Option<PlayerProfile>> {
        let row = sqlx::query(&format!(
            "SELECT {PROFILE_COLUMNS} FROM player_profiles WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_profile).transpose()
    }

    /// Replace every profile field for a player Principal.
    ///
    /// Zero affected rows means the Principal has no profile (it is not a
    /// player, or does not exist) and is reported as `NotFound`.
    pub async fn update(
        &self,
        user_id: Uuid,
        update: &PlayerProfileUpdate,
    ) -> ApiResult<PlayerProfile> {
        info!("Updating player profile for user {}", user_id);

        let result = sqlx::query(
            "UPDATE player_profiles SET height = $1, weight = $2, preferred_foot = $3, \
             bio = $4, video_url = $5 WHERE user_id = $6",
        )
        .bind(update.height)
        .bind(update.weight)
        .bind(update.preferred_foot.map(|f| f.as_str()))
        .bind(&update.bio)
        .bind(&update.video_url)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound);
        }

        self.find_by_user(user_id).await?.ok_or(ApiError::NotFound)
    }
}

fn row_to_profile(row: &PgRow) -> ApiResult<PlayerProfile> {
    let foot_raw: Option<String> = row.get("preferred_foot");
    let preferred_foot = match foot_raw {
        Some(raw) => Some(PreferredFoot::parse(&raw).ok_or_else(|| {
            ApiError::Database(sqlx::Error::Decode(
                format!("unknown preferred_foot value in player_profiles row: {raw}").into(),
            ))
        })?),
        None => None,
    };

    Ok(PlayerProfile {
        id: row.get("id"),
        user_id: row.get("user_id"),
        height: row.get("height"),
        weight: row.get("weight"),
        preferred_foot,
        bio: row.get("bio"),
        video_url: row.get("video_url"),
    })
}
