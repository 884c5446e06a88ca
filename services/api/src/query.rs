//! Filtered entity-query composer
//!
//! Translates a [`SearchCriteria`] into a parameterized SELECT plus its bound
//! parameter list. Every entity listing in the platform (player search, scout
//! listing, admin listing) goes through this builder: a fixed projection and
//! a fixed base predicate per entity type, then one predicate per present
//! criteria field, AND-combined, each carrying its values as typed binds.
//! User input never reaches the query text itself.
//!
//! The composer is pure and performs no I/O. The repository binds the
//! produced parameter list onto sqlx in order.

use crate::error::{ApiError, ApiResult};
use crate::models::SearchCriteria;

/// A single bound parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
    Int(i64),
}

/// A composed, parameterized SELECT and its bind values in placeholder order
#[derive(Debug, Clone)]
pub struct ComposedQuery {
    pub sql: String,
    pub binds: Vec<BindValue>,
}

/// Builder for filtered entity SELECTs
#[derive(Debug, Clone)]
pub struct FilteredSelect {
    projection: String,
    table: String,
    clauses: Vec<String>,
    binds: Vec<BindValue>,
    order_by: String,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl FilteredSelect {
    /// Start a select over `table` with a fixed projection.
    ///
    /// Default ordering is most-recently-created first.
    pub fn new(projection: &str, table: &str) -> Self {
        FilteredSelect {
            projection: projection.to_string(),
            table: table.to_string(),
            clauses: Vec::new(),
            binds: Vec::new(),
            order_by: "created_at DESC".to_string(),
            limit: None,
            offset: None,
        }
    }

    /// Add a fixed base predicate that is part of the entity definition
    /// (e.g. `role = 'player'`). Never built from user input.
    pub fn base(mut self, clause: &str) -> Self {
        self.clauses.push(clause.to_string());
        self
    }

    /// Override the default ordering. Never built from user input.
    pub fn order_by(mut self, clause: &str) -> Self {
        self.order_by = clause.to_string();
        self
    }

    /// Apply a criteria object: one AND-combined predicate per present field.
    ///
    /// Age bounds are translated to birth-year bounds against
    /// `reference_year` (the current calendar year at query time). A
    /// min_age greater than max_age yields an empty window; no correction
    /// is attempted. Negative limit or offset is rejected, not clamped.
    pub fn criteria(mut self, criteria: &SearchCriteria, reference_year: i32) -> ApiResult<Self> {
        if let Some(country) = non_empty(&criteria.country) {
            let n = self.bind(BindValue::Text(country.to_string()));
            self.clauses.push(format!("country = ${n}"));
        }

        if let Some(position) = non_empty(&criteria.position) {
            let n = self.bind(BindValue::Text(position.to_string()));
            self.clauses.push(format!("position = ${n}"));
        }

        // A principal at least min_age years old was born in or before
        // reference_year - min_age; at most max_age years old, in or after
        // reference_year - max_age.
        if let Some(min_age) = criteria.min_age {
            let bound = i64::from(reference_year) - i64::from(min_age);
            let n = self.bind(BindValue::Int(bound));
            self.clauses
                .push(format!("EXTRACT(YEAR FROM date_of_birth) <= ${n}"));
        }

        if let Some(max_age) = criteria.max_age {
            let bound = i64::from(reference_year) - i64::from(max_age);
            let n = self.bind(BindValue::Int(bound));
            self.clauses
                .push(format!("EXTRACT(YEAR FROM date_of_birth) >= ${n}"));
        }

        if let Some(text) = non_empty(&criteria.free_text) {
            let pattern = format!("%{text}%");
            let a = self.bind(BindValue::Text(pattern.clone()));
            let b = self.bind(BindValue::Text(pattern.clone()));
            let c = self.bind(BindValue::Text(pattern));
            self.clauses.push(format!(
                "(full_name ILIKE ${a} OR username ILIKE ${b} OR position ILIKE ${c})"
            ));
        }

        if let Some(limit) = criteria.limit {
            if limit < 0 {
                return Err(ApiError::Validation {
                    field: "limit",
                    message: "must not be negative".to_string(),
                });
            }
            self.limit = Some(limit);
        }

        if let Some(offset) = criteria.offset {
            if offset < 0 {
                return Err(ApiError::Validation {
                    field: "offset",
                    message: "must not be negative".to_string(),
                });
            }
            self.offset = Some(offset);
        }

        Ok(self)
    }

    /// Compose a COUNT over the same predicates, without ordering or window
    pub fn build_count(&self) -> ComposedQuery {
        let mut sql = format!("SELECT COUNT(*) FROM {}", self.table);
        if !self.clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.clauses.join(" AND "));
        }

        ComposedQuery {
            sql,
            binds: self.binds.clone(),
        }
    }

    /// Compose the final SELECT
    pub fn build(mut self) -> ComposedQuery {
        let mut sql = format!("SELECT {} FROM {}", self.projection, self.table);
        if !self.clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.clauses.join(" AND "));
        }
        sql.push_str(&format!(" ORDER BY {}", self.order_by));

        if let Some(limit) = self.limit {
            let n = self.bind(BindValue::Int(limit));
            sql.push_str(&format!(" LIMIT ${n}"));
        }
        if let Some(offset) = self.offset {
            let n = self.bind(BindValue::Int(offset));
            sql.push_str(&format!(" OFFSET ${n}"));
        }

        ComposedQuery {
            sql,
            binds: self.binds,
        }
    }

    /// Push a bind value and return its 1-based placeholder index
    fn bind(&mut self, value: BindValue) -> usize {
        self.binds.push(value);
        self.binds.len()
    }
}

/// Absent and empty (after trimming) are the same: no filter
fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
