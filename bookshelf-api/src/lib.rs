//! # Bookshelf API Server Library
//!
//! GraphQL API over the Bookshelf document store.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `graphql`: Schema, query and mutation roots
//! - `resolvers`: Resolver logic shared by the GraphQL roots
//! - `routes`: HTTP route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod graphql;
pub mod resolvers;
pub mod routes;
