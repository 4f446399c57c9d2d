//! GraphQL schema for Bookshelf
//!
//! - Query resolvers: users, user, books, book
//! - Mutation resolvers: createUser, login, saveBook, deleteBook
//! - Object types wrapping the shared models
//!
//! Resolvers reach the store through the [`Resolvers`] value registered as
//! schema data.

pub mod mutation;
pub mod query;
pub mod types;

use async_graphql::{EmptySubscription, Schema};

pub use mutation::MutationRoot;
pub use query::QueryRoot;

use crate::resolvers::Resolvers;

/// Complete Bookshelf schema
pub type BookshelfSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Builds the schema around a resolver set
pub fn build_schema(resolvers: Resolvers) -> BookshelfSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(resolvers)
        .finish()
}
