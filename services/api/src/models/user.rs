//! Principal model and related payloads

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account role. Immutable after creation.
///
/// `Admin` principals are provisioned out-of-band; registration only accepts
/// the end-user roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Player,
    Scout,
    Club,
    Admin,
}

impl Role {
    /// The value stored in the `users.role` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Player => "player",
            Role::Scout => "scout",
            Role::Club => "club",
            Role::Admin => "admin",
        }
    }

    /// Parse a stored or user-supplied role value
    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "player" => Some(Role::Player),
            "scout" => Some(Role::Scout),
            "club" => Some(Role::Club),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    /// Whether this role may be chosen at registration
    pub fn self_registerable(&self) -> bool {
        !matches!(self, Role::Admin)
    }
}

/// Principal entity, one row of the `users` table
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub full_name: String,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub position: Option<String>,
    pub current_club: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Principal as returned to callers: the password hash is stripped
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub full_name: String,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub position: Option<String>,
    pub current_club: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        PublicUser {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            full_name: user.full_name,
            phone: user.phone,
            country: user.country,
            date_of_birth: user.date_of_birth,
            position: user.position,
            current_club: user.current_club,
            created_at: user.created_at,
        }
    }
}

/// Registration payload
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub full_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub current_club: Option<String>,
}

/// Full replacement of the mutable profile fields of a Principal
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileUpdate {
    pub full_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub current_club: Option<String>,
}

/// Login payload; the identifier may be a username or an email
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}
