//! GraphQL Query resolvers

use async_graphql::{Context, ErrorExtensions, Object, Result, ID};

use super::types::{Book, User};
use crate::resolvers::Resolvers;

/// Root query object
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Get all users
    async fn users(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        let users = ctx
            .data::<Resolvers>()?
            .users()
            .await
            .map_err(|e| e.extend())?;

        Ok(users.into_iter().map(User::from).collect())
    }

    /// Get a user by ID and username, with saved books expanded
    async fn user(&self, ctx: &Context<'_>, username: String, user_id: ID) -> Result<Option<User>> {
        let user = ctx
            .data::<Resolvers>()?
            .user(&username, &user_id)
            .await
            .map_err(|e| e.extend())?;

        Ok(user.map(User::from))
    }

    /// Get books, optionally only those saved by a user
    async fn books(&self, ctx: &Context<'_>, user_id: Option<ID>) -> Result<Vec<Book>> {
        let books = ctx
            .data::<Resolvers>()?
            .books(user_id.as_deref().map(String::as_str))
            .await
            .map_err(|e| e.extend())?;

        Ok(books.into_iter().map(Book::from).collect())
    }

    /// Get a book by its book ID
    async fn book(&self, ctx: &Context<'_>, book_id: String) -> Result<Option<Book>> {
        let book = ctx
            .data::<Resolvers>()?
            .book(&book_id)
            .await
            .map_err(|e| e.extend())?;

        Ok(book.map(Book::from))
    }
}
