//! Input validation
//!
//! All checks run before any store round trip and report per-field errors.

use regex::Regex;
use std::sync::OnceLock;

use crate::error::{ApiError, ApiResult};
use crate::models::{NewUser, ProfileUpdate};

/// Validate a username: 3-32 characters, letters, digits, underscores
pub fn validate_username(username: &str) -> ApiResult<()> {
    if username.is_empty() {
        return Err(invalid("username", "is required"));
    }

    if username.len() < 3 {
        return Err(invalid("username", "must be at least 3 characters long"));
    }

    if username.len() > 32 {
        return Err(invalid("username", "must be at most 32 characters long"));
    }

    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = USERNAME_REGEX
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("Failed to compile username regex"));

    if !regex.is_match(username) {
        return Err(invalid(
            "username",
            "may only contain letters, numbers, and underscores",
        ));
    }

    Ok(())
}

/// Validate an email address shape
pub fn validate_email(email: &str) -> ApiResult<()> {
    if email.is_empty() {
        return Err(invalid("email", "is required"));
    }

    if email.len() > 254 {
        return Err(invalid("email", "must be at most 254 characters long"));
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err(invalid("email", "is not a valid address"));
    }

    Ok(())
}

/// Validate a raw password against the platform's length policy
pub fn validate_password(password: &str) -> ApiResult<()> {
    if password.is_empty() {
        return Err(invalid("password", "is required"));
    }

    if password.len() < 8 {
        return Err(invalid("password", "must be at least 8 characters long"));
    }

    if password.len() > 128 {
        return Err(invalid("password", "must be at most 128 characters long"));
    }

    Ok(())
}

/// Validate a complete registration payload
pub fn validate_new_user(new_user: &NewUser) -> ApiResult<()> {
    validate_username(&new_user.username)?;
    validate_email(&new_user.email)?;
    validate_password(&new_user.password)?;

    if !new_user.role.self_registerable() {
        return Err(invalid("role", "cannot be chosen at registration"));
    }

    if new_user.full_name.trim().is_empty() {
        return Err(invalid("full_name", "is required"));
    }

    Ok(())
}

/// Validate a profile replacement payload
pub fn validate_profile_update(update: &ProfileUpdate) -> ApiResult<()> {
    if update.full_name.trim().is_empty() {
        return Err(invalid("full_name", "is required"));
    }

    Ok(())
}

fn invalid(field: &'static str, message: &str) -> ApiError {
    ApiError::Validation {
        field,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn field_of(err: ApiError) -> &'static str {
        match err {
            ApiError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn accepts_reasonable_usernames() {
        assert!(validate_username("amara10").is_ok());
        assert!(validate_username("big_scout_99").is_ok());
    }

    #[test]
    fn rejects_bad_usernames() {
        assert_eq!(field_of(validate_username("").unwrap_err()), "username");
        assert_eq!(field_of(validate_username("ab").unwrap_err()), "username");
        assert_eq!(
            field_of(validate_username(&"x".repeat(33)).unwrap_err()),
            "username"
        );
        assert_eq!(
            field_of(validate_username("no spaces").unwrap_err()),
            "username"
        );
        assert_eq!(
            field_of(validate_username("émile").unwrap_err()),
            "username"
        );
    }

    #[test]
    fn rejects_malformed_emails() {
        assert!(validate_email("scout@club.example").is_ok());
        assert_eq!(field_of(validate_email("").unwrap_err()), "email");
        assert_eq!(field_of(validate_email("not-an-email").unwrap_err()), "email");
        assert_eq!(field_of(validate_email("missing@tld").unwrap_err()), "email");
    }

    #[test]
    fn enforces_password_length_window() {
        assert!(validate_password("longenough").is_ok());
        assert_eq!(field_of(validate_password("").unwrap_err()), "password");
        assert_eq!(field_of(validate_password("short").unwrap_err()), "password");
        assert_eq!(
            field_of(validate_password(&"p".repeat(129)).unwrap_err()),
            "password"
        );
    }

    #[test]
    fn registration_rejects_admin_role_and_blank_name() {
        let mut new_user = NewUser {
            username: "amara10".to_string(),
            email: "amara@example.com".to_string(),
            password: "longenough".to_string(),
            role: Role::Admin,
            full_name: "Amara Conteh".to_string(),
            phone: None,
            country: None,
            date_of_birth: None,
            position: None,
            current_club: None,
        };
        assert_eq!(field_of(validate_new_user(&new_user).unwrap_err()), "role");

        new_user.role = Role::Player;
        new_user.full_name = "   ".to_string();
        assert_eq!(
            field_of(validate_new_user(&new_user).unwrap_err()),
            "full_name"
        );

        new_user.full_name = "Amara Conteh".to_string();
        assert!(validate_new_user(&new_user).is_ok());
    }
}
