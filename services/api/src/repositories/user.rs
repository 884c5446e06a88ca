//! User repository: CRUD and lookup over Principals
//!
//! All filtered reads go through the query composer; all store errors are
//! translated into the API taxonomy at this boundary. Uniqueness is enforced
//! by the store's constraints; the `*_exists` pre-checks are a fast path
//! for the common case, not a correctness guarantee.

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use chrono::{Datelike, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{NewUser, ProfileUpdate, PublicUser, Role, SearchCriteria, User};
use crate::query::{BindValue, ComposedQuery, FilteredSelect};
use crate::validation;

/// Projection shared by every Principal read
const USER_COLUMNS: &str = "id, username, email, password_hash, role, full_name, phone, country, \
                            date_of_birth, position, current_club, created_at";

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a new Principal.
    ///
    /// Validates every field first (no store round trip on failure), hashes
    /// the password, and inserts the Principal (plus, for players, the
    /// profile row) in a single transaction, so partial creation cannot
    /// occur. A unique violation at insert time is reported as the
    /// corresponding duplicate error.
    pub async fn create(&self, new_user: &NewUser) -> ApiResult<PublicUser> {
        validation::validate_new_user(new_user)?;

        info!("Registering new user: {}", new_user.username);

        // Advisory fast path; the insert below remains the authority.
        if self.username_exists(&new_user.username).await? {
            return Err(ApiError::DuplicateUsername);
        }
        if self.email_exists(&new_user.email).await? {
            return Err(ApiError::DuplicateEmail);
        }

        let salt = SaltString::generate(&mut rand::thread_rng());
        let password_hash = Argon2::default()
            .hash_password(new_user.password.as_bytes(), &salt)
            .map_err(|e| ApiError::Internal(format!("failed to hash password: {e}")))?
            .to_string();

        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(&format!(
            "INSERT INTO users (username, email, password_hash, role, full_name, phone, \
             country, date_of_birth, position, current_club) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&password_hash)
        .bind(new_user.role.as_str())
        .bind(&new_user.full_name)
        .bind(&new_user.phone)
        .bind(&new_user.country)
        .bind(new_user.date_of_birth)
        .bind(&new_user.position)
        .bind(&new_user.current_club)
        .fetch_one(&mut *tx)
        .await?;

        let user = row_to_user(&row)?;

        if user.role == Role::Player {
            sqlx::query("INSERT INTO player_profiles (user_id) VALUES ($1)")
                .bind(user.id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        info!("Registered user {} with role {}", user.id, user.role.as_str());
        Ok(user.into())
    }

    /// Verify credentials against an account found by username or email.
    ///
    /// Zero matches is `NotFound`; a hash mismatch is `InvalidCredentials`.
    /// The returned Principal has the password hash stripped.
    pub async fn authenticate(&self, identifier: &str, password: &str) -> ApiResult<PublicUser> {
        let user = self
            .find_by_identifier(identifier)
            .await?
            .ok_or(ApiError::NotFound)?;

        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|e| ApiError::Internal(format!("failed to parse password hash: {e}")))?;

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| ApiError::InvalidCredentials)?;

        Ok(user.into())
    }

    /// Find a Principal by ID; absence is not an error
    pub async fn find_by_id(&self, id: Uuid) -> ApiResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_user).transpose()
    }

    /// Find a Principal by username; absence is not an error
    pub async fn find_by_username(&self, username: &str) -> ApiResult<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_user).transpose()
    }

    /// Find a Principal by username or email
    async fn find_by_identifier(&self, identifier: &str) -> ApiResult<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1 OR email = $1"
        ))
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_user).transpose()
    }

    /// Replace the mutable profile fields of a Principal.
    ///
    /// A missing id is `NotFound`, checked separately so it is never
    /// conflated with a write that unexpectedly affected zero rows
    /// (`UpdateFailed`).
    pub async fn update(&self, id: Uuid, update: &ProfileUpdate) -> ApiResult<PublicUser> {
        validation::validate_profile_update(update)?;

        if self.find_by_id(id).await?.is_none() {
            return Err(ApiError::NotFound);
        }

        let result = sqlx::query(
            "UPDATE users SET full_name = $1, phone = $2, country = $3, date_of_birth = $4, \
             position = $5, current_club = $6 WHERE id = $7",
        )
        .bind(&update.full_name)
        .bind(&update.phone)
        .bind(&update.country)
        .bind(update.date_of_birth)
        .bind(&update.position)
        .bind(&update.current_club)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::UpdateFailed);
        }

        self.find_by_id(id)
            .await?
            .map(PublicUser::from)
            .ok_or(ApiError::UpdateFailed)
    }

    /// Filtered listing over Principals, newest first.
    ///
    /// `base_role` pins the entity type (player search, scout listing);
    /// `None` lists every role for administrative views. Returns the page
    /// of results and the total count under the same predicates. No rows
    /// is an empty Vec, not an error.
    pub async fn search(
        &self,
        base_role: Option<Role>,
        criteria: &SearchCriteria,
    ) -> ApiResult<(Vec<PublicUser>, i64)> {
        let reference_year = Utc::now().year();

        let mut select = FilteredSelect::new(USER_COLUMNS, "users");
        if let Some(role) = base_role {
            select = select.base(&format!("role = '{}'", role.as_str()));
        }
        let select = select.criteria(criteria, reference_year)?;

        let total = self.fetch_count(select.build_count()).await?;
        let rows = self.fetch_rows(select.build()).await?;

        let users = rows
            .iter()
            .map(|row| row_to_user(row).map(PublicUser::from))
            .collect::<ApiResult<Vec<_>>>()?;

        Ok((users, total))
    }

    /// Count Principals holding a role
    pub async fn count_by_role(&self, role: Role) -> ApiResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = $1")
            .bind(role.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Delete a Principal; the player profile goes with it via cascade.
    /// Returns whether a row was removed.
    pub async fn delete(&self, id: Uuid) -> ApiResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Advisory uniqueness pre-check
    async fn username_exists(&self, username: &str) -> ApiResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// Advisory uniqueness pre-check
    async fn email_exists(&self, email: &str) -> ApiResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn fetch_rows(&self, query: ComposedQuery) -> ApiResult<Vec<PgRow>> {
        let mut q = sqlx::query(&query.sql);
        for bind in &query.binds {
            q = match bind {
                BindValue::Text(s) => q.bind(s),
                BindValue::Int(i) => q.bind(i),
            };
        }
        Ok(q.fetch_all(&self.pool).await?)
    }

    async fn fetch_count(&self, query: ComposedQuery) -> ApiResult<i64> {
        let mut q = sqlx::query_scalar::<_, i64>(&query.sql);
        for bind in &query.binds {
            q = match bind {
                BindValue::Text(s) => q.bind(s),
                BindValue::Int(i) => q.bind(i),
            };
        }
        Ok(q.fetch_one(&self.pool).await?)
    }
}

fn row_to_user(row: &PgRow) -> ApiResult<User> {
    let role_raw: String = row.get("role");
    let role = Role::parse(&role_raw).ok_or_else(|| {
        ApiError::Database(sqlx::Error::Decode(
            format!("unknown role value in users row: {role_raw}").into(),
        ))
    })?;

    Ok(User {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        role,
        full_name: row.get("full_name"),
        phone: row.get("phone"),
        country: row.get("country"),
        date_of_birth: row.get("date_of_birth"),
        position: row.get("position"),
        current_club: row.get("current_club"),
        created_at: row.get("created_at"),
    })
}
