//! Search criteria value object
//!
//! Transient filter description used to compose entity listings. Each present
//! field narrows the result set; absent and empty-string fields contribute no
//! filter at all (the composer treats both identically).

use serde::Deserialize;

/// Optional-field filter criteria for player/scout search and admin listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchCriteria {
    /// Exact country match
    #[serde(default)]
    pub country: Option<String>,
    /// Exact position match
    #[serde(default)]
    pub position: Option<String>,
    /// Inclusive lower age bound, translated to a birth-year upper bound
    #[serde(default)]
    pub min_age: Option<u32>,
    /// Inclusive upper age bound, translated to a birth-year lower bound
    #[serde(default)]
    pub max_age: Option<u32>,
    /// Case-insensitive substring over full name, username, and position
    #[serde(default, alias = "q")]
    pub free_text: Option<String>,
    /// Result window size; absent means unbounded
    #[serde(default)]
    pub limit: Option<i64>,
    /// Result window start; absent means zero
    #[serde(default)]
    pub offset: Option<i64>,
}

impl SearchCriteria {
    /// Criteria with no filters: the base predicate alone decides membership
    pub fn none() -> Self {
        SearchCriteria::default()
    }
}
