//! API models: entities, payloads, and the response envelope

use serde::Serialize;

pub mod criteria;
pub mod profile;
pub mod user;

// Re-export for convenience
pub use criteria::SearchCriteria;
pub use profile::{PlayerProfile, PlayerProfileUpdate, PreferredFoot};
pub use user::{LoginRequest, NewUser, ProfileUpdate, PublicUser, Role, User};

/// Uniform response envelope: `{success, message?, data?}`
///
/// Success responses are built here; failure responses are rendered by
/// `ApiError::into_response` with the same shape.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    /// A successful response carrying a payload
    pub fn data(data: T) -> Self {
        Envelope {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    /// A successful response with both a message and a payload
    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Envelope {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl Envelope<()> {
    /// A successful response with only a message
    pub fn message(message: impl Into<String>) -> Self {
        Envelope {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_skips_absent_fields() {
        let body = serde_json::to_value(Envelope::data(1)).unwrap();
        assert_eq!(body, serde_json::json!({"success": true, "data": 1}));

        let body = serde_json::to_value(Envelope::message("done")).unwrap();
        assert_eq!(body, serde_json::json!({"success": true, "message": "done"}));
    }
}
