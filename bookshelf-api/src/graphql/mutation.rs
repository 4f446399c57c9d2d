//! GraphQL Mutation resolvers

use async_graphql::{Context, ErrorExtensions, Object, Result, ID};

use super::types::{Auth, BookInput, User};
use crate::resolvers::Resolvers;

/// Root mutation object
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Register a user and return a token for them
    async fn create_user(
        &self,
        ctx: &Context<'_>,
        username: String,
        email: String,
        password: String,
    ) -> Result<Auth> {
        let auth = ctx
            .data::<Resolvers>()?
            .create_user(&username, &email, &password)
            .await
            .map_err(|e| e.extend())?;

        Ok(auth.into())
    }

    /// Log in with email and password
    async fn login(&self, ctx: &Context<'_>, email: String, password: String) -> Result<Auth> {
        let auth = ctx
            .data::<Resolvers>()?
            .login(&email, &password)
            .await
            .map_err(|e| e.extend())?;

        Ok(auth.into())
    }

    /// Add a book to a user's saved books
    async fn save_book(
        &self,
        ctx: &Context<'_>,
        user_id: ID,
        book_id: String,
        book: Option<BookInput>,
    ) -> Result<Option<User>> {
        let user = ctx
            .data::<Resolvers>()?
            .save_book(&user_id, &book_id, book.map(Into::into))
            .await
            .map_err(|e| e.extend())?;

        Ok(user.map(User::from))
    }

    /// Remove a book from a user's saved books
    async fn delete_book(
        &self,
        ctx: &Context<'_>,
        user_id: ID,
        book_id: String,
    ) -> Result<Option<User>> {
        let user = ctx
            .data::<Resolvers>()?
            .delete_book(&user_id, &book_id)
            .await
            .map_err(|e| e.extend())?;

        Ok(user.map(User::from))
    }
}
