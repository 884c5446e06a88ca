//! Scoutbase API service
//!
//! The web backend of the Scoutbase scouting platform: registration and
//! authentication, server-side sessions, player/scout search, and the
//! administrative listing and reporting endpoints, all backed by
//! PostgreSQL with Redis holding session state.
//!
//! ## Module organization
//!
//! - [`query`] - the filtered entity-query composer behind every listing
//! - [`repositories`] - CRUD and lookup over Principals and player profiles
//! - [`session`] - session store and the per-request identity gate
//! - [`routes`] - axum handlers and the response envelope
//! - [`validation`] / [`rate_limiter`] - input checks and login throttling

pub mod error;
pub mod middleware;
pub mod models;
pub mod query;
pub mod rate_limiter;
pub mod repositories;
pub mod routes;
pub mod session;
pub mod state;
pub mod validation;
