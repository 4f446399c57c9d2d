/// PostgreSQL-backed [`Store`]

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::{validate_book, Store, StoreError, StoreResult};
use crate::db::pool;
use crate::models::{
    book::{self, Book, BookInput},
    user::{CreateUser, User},
};

/// Store over a shared `sqlx` connection pool
///
/// Cloning is cheap; clones share the pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn find_users(&self) -> StoreResult<Vec<User>> {
        Ok(User::list_all(&self.pool).await?)
    }

    async fn find_user(&self, id: Uuid, username: &str) -> StoreResult<Option<User>> {
        Ok(User::find_by_id_and_username(&self.pool, id, username).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(User::find_by_email(&self.pool, email).await?)
    }

    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        let new_user = data.into_new_user()?;
        let user = User::create(&self.pool, new_user).await?;

        debug!(user_id = %user.id, "Inserted user");
        Ok(user)
    }

    async fn add_saved_book(&self, user_id: Uuid, book_id: &str) -> StoreResult<Option<User>> {
        book::validate_book_id(book_id).map_err(StoreError::Validation)?;
        Ok(User::add_saved_book(&self.pool, user_id, book_id).await?)
    }

    async fn remove_saved_book(
        &self,
        user_id: Uuid,
        book_id: &str,
    ) -> StoreResult<Option<User>> {
        Ok(User::remove_saved_book(&self.pool, user_id, book_id).await?)
    }

    async fn upsert_book(&self, book_id: &str, input: BookInput) -> StoreResult<Book> {
        validate_book(book_id, &input)?;

        Ok(Book::upsert(&self.pool, book_id, input).await?)
    }

    async fn find_books(&self, saved_by: Option<Uuid>) -> StoreResult<Vec<Book>> {
        let books = match saved_by {
            Some(user_id) => Book::list_saved_by(&self.pool, user_id).await?,
            None => Book::list_all(&self.pool).await?,
        };

        Ok(books)
    }

    async fn find_book(&self, book_id: &str) -> StoreResult<Option<Book>> {
        Ok(Book::find_by_book_id(&self.pool, book_id).await?)
    }

    async fn find_books_by_ids(&self, book_ids: &[String]) -> StoreResult<Vec<Book>> {
        if book_ids.is_empty() {
            return Ok(Vec::new());
        }

        let books = Book::list_by_book_ids(&self.pool, book_ids).await?;
        Ok(book::order_by_references(books, book_ids))
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(pool::health_check(&self.pool).await?)
    }
}
