//! # Bookshelf Shared Library
//!
//! Types, storage and authentication primitives used by the Bookshelf
//! GraphQL API.
//!
//! ## Module Organization
//!
//! - `models`: User and Book records with their PostgreSQL queries
//! - `store`: The `Store` persistence trait and its implementations
//! - `auth`: Password hashing and token issuance
//! - `db`: Connection pool management

pub mod auth;
pub mod db;
pub mod models;
pub mod store;

/// Current version of the Bookshelf shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
