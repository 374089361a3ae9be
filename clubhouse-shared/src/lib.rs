//! # Clubhouse Shared Library
//!
//! Domain model, persistence and business logic for the Clubhouse API.
//!
//! ## Module Organization
//!
//! - `models`: entities, inputs and public projections
//! - `error`: the error registry (`ServiceError`)
//! - `response`: success and failure envelopes
//! - `repository`: storage ports with Postgres and in-memory adapters
//! - `services`: membership, feed, comment and user operations
//! - `auth`: bearer tokens and password hashing
//! - `db`: connection pool and migrations

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod repository;
pub mod response;
pub mod services;

/// Current version of the Clubhouse shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
