//! Shared infrastructure for the Scoutbase platform
//!
//! This crate provides the pieces every Scoutbase service needs before it can
//! do any real work: the PostgreSQL connection pool, the Redis connection
//! used as the session store, and the error types those two produce.

pub mod cache;
pub mod database;
pub mod error;
