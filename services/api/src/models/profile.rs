//! Player profile model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Preferred foot of a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferredFoot {
    Left,
    Right,
    Both,
}

impl PreferredFoot {
    pub fn as_str(&self) -> &'static str {
        match self {
            PreferredFoot::Left => "left",
            PreferredFoot::Right => "right",
            PreferredFoot::Both => "both",
        }
    }

    pub fn parse(value: &str) -> Option<PreferredFoot> {
        match value {
            "left" => Some(PreferredFoot::Left),
            "right" => Some(PreferredFoot::Right),
            "both" => Some(PreferredFoot::Both),
            _ => None,
        }
    }
}

/// Player profile entity, 1:1 with a player Principal
#[derive(Debug, Clone, Serialize)]
pub struct PlayerProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub preferred_foot: Option<PreferredFoot>,
    pub bio: Option<String>,
    pub video_url: Option<String>,
}

/// Full replacement of the player profile fields
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerProfileUpdate {
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub preferred_foot: Option<PreferredFoot>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preferred_foot_round_trips() {
        for foot in [PreferredFoot::Left, PreferredFoot::Right, PreferredFoot::Both] {
            assert_eq!(PreferredFoot::parse(foot.as_str()), Some(foot));
        }
        assert_eq!(PreferredFoot::parse("ambidextrous"), None);
    }
}
