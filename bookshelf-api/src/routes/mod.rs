/// API route handlers
///
/// - `health`: Health and readiness endpoints
/// - `graphql`: GraphQL endpoint and GraphiQL IDE

pub mod graphql;
pub mod health;
