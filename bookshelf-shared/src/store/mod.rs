/// Persistence port for users and books
///
/// The resolver layer talks to storage only through the [`Store`] trait.
/// Two implementations are provided:
///
/// - [`PgStore`]: PostgreSQL via `sqlx`
/// - [`MemoryStore`]: in-process, same semantics, for tests and local runs
///
/// # Store Contract
///
/// Implementations must:
/// 1. Validate and hash new users before persisting them (`create_user`)
/// 2. Enforce unique `username` and `email`, failing with
///    [`StoreError::Duplicate`]
/// 3. Apply `add_saved_book` / `remove_saved_book` atomically per user, with
///    set semantics (no duplicate IDs, removal of an absent ID is a no-op)
/// 4. Report "no such record" as `None` / empty, never as an error
///
/// # Example
///
/// ```no_run
/// use bookshelf_shared::models::user::CreateUser;
/// use bookshelf_shared::store::{MemoryStore, Store};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::new();
///
/// let user = store
///     .create_user(CreateUser {
///         username: "amy".to_string(),
///         email: "amy@example.com".to_string(),
///         password: "password1".to_string(),
///     })
///     .await?;
///
/// store.add_saved_book(user.id, "B1").await?;
/// # Ok(())
/// # }
/// ```

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::password::PasswordError;
use crate::models::{
    book::{Book, BookInput},
    user::{CreateUser, CreateUserError, User},
};

/// Store failure
///
/// Every variant is passed through to the caller untouched; the resolver
/// layer never retries or recovers.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Unique constraint violated on `field`
    #[error("Duplicate key: a record with this {field} already exists")]
    Duplicate { field: String },

    /// Input rejected by a store validator
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Identity that is not a valid UUID
    #[error("Cast to identity failed for value \"{0}\"")]
    InvalidId(String),

    /// Password hashing failed while creating a user
    #[error("Password hashing failed: {0}")]
    Password(#[from] PasswordError),

    /// Connectivity or query failure
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl StoreError {
    /// Short machine-readable name for the variant
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::Duplicate { .. } => "duplicate",
            StoreError::Validation(_) => "validation",
            StoreError::InvalidId(_) => "invalid_id",
            StoreError::Password(_) => "password",
            StoreError::Database(_) => "database",
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                let field = match db_err.constraint() {
                    Some(c) if c.contains("email") => "email",
                    Some(c) if c.contains("username") => "username",
                    Some(c) if c.contains("book_id") => "bookId",
                    _ => "key",
                };
                return StoreError::Duplicate {
                    field: field.to_string(),
                };
            }
        }

        StoreError::Database(err)
    }
}

impl From<validator::ValidationErrors> for StoreError {
    fn from(err: validator::ValidationErrors) -> Self {
        StoreError::Validation(err.to_string())
    }
}

impl From<CreateUserError> for StoreError {
    fn from(err: CreateUserError) -> Self {
        match err {
            CreateUserError::Validation(errors) => errors.into(),
            CreateUserError::Password(e) => StoreError::Password(e),
        }
    }
}

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Parses a caller-supplied identity
///
/// # Errors
///
/// Returns [`StoreError::InvalidId`] if `raw` is not a UUID.
pub fn parse_id(raw: &str) -> StoreResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| StoreError::InvalidId(raw.to_string()))
}

/// Runs the book validators without touching storage
///
/// # Errors
///
/// Returns [`StoreError::Validation`] for a bad `book_id` or book details.
pub fn validate_book(book_id: &str, input: &BookInput) -> StoreResult<()> {
    crate::models::book::validate_book_id(book_id).map_err(StoreError::Validation)?;
    validator::Validate::validate(input)?;
    Ok(())
}

/// User and book persistence
#[async_trait]
pub trait Store: Send + Sync {
    /// All users
    async fn find_users(&self) -> StoreResult<Vec<User>>;

    /// The user with both `id` and `username`
    async fn find_user(&self, id: Uuid, username: &str) -> StoreResult<Option<User>>;

    /// The user with `email`
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Validates, hashes and inserts a new user
    async fn create_user(&self, data: CreateUser) -> StoreResult<User>;

    /// Set-add of `book_id` to the user's saved books
    ///
    /// Returns the updated user, `None` if the user does not exist.
    async fn add_saved_book(&self, user_id: Uuid, book_id: &str) -> StoreResult<Option<User>>;

    /// Set-remove of `book_id` from the user's saved books
    ///
    /// Returns the updated user, `None` if the user does not exist.
    async fn remove_saved_book(&self, user_id: Uuid, book_id: &str)
        -> StoreResult<Option<User>>;

    /// Inserts a book or refreshes its details
    async fn upsert_book(&self, book_id: &str, input: BookInput) -> StoreResult<Book>;

    /// Books, optionally restricted to those saved by `saved_by`
    async fn find_books(&self, saved_by: Option<Uuid>) -> StoreResult<Vec<Book>>;

    /// The book with application-level ID `book_id`
    async fn find_book(&self, book_id: &str) -> StoreResult<Option<Book>>;

    /// Expands references into books, in reference order
    async fn find_books_by_ids(&self, book_ids: &[String]) -> StoreResult<Vec<Book>>;

    /// Connectivity check
    async fn ping(&self) -> StoreResult<()>;
}
