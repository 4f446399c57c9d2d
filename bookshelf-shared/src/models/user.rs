/// User model and database operations
///
/// A user owns a set of saved-book references (`saved_books`), stored as a
/// `TEXT[]` column so that adding and removing a reference are single atomic
/// statements.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     username TEXT NOT NULL CONSTRAINT users_username_key UNIQUE,
///     email TEXT NOT NULL CONSTRAINT users_email_key UNIQUE,
///     password_hash TEXT NOT NULL,
///     saved_books TEXT[] NOT NULL DEFAULT '{}',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use bookshelf_shared::models::user::{NewUser, User};
/// use bookshelf_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(
///     &pool,
///     NewUser {
///         username: "amy".to_string(),
///         email: "amy@example.com".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///     },
/// )
/// .await?;
///
/// let found = User::find_by_email(&pool, "amy@example.com").await?;
/// assert_eq!(found.map(|u| u.id), Some(user.id));
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::auth::password::{self, PasswordError};

const USER_COLUMNS: &str = "id, username, email, password_hash, saved_books";

/// User account with its saved-book references
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Storage identity (UUID v4)
    pub id: Uuid,

    /// Unique username
    pub username: String,

    /// Unique email address
    pub email: String,

    /// Argon2id password hash
    ///
    /// Never serialized to clients.
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Application-level book IDs, in insertion order, without duplicates
    pub saved_books: Vec<String>,
}

/// Registration input as received from the caller
///
/// The password is plaintext here; the store validates this struct and
/// hashes the password before anything is persisted.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUser {
    /// Desired username
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    /// Email address
    #[validate(email(message = "Must match an email address!"))]
    pub email: String,

    /// Plaintext password
    #[validate(length(min = 5, message = "Password must be at least 5 characters"))]
    pub password: String,
}

impl CreateUser {
    /// Trims, validates and hashes the password
    ///
    /// Username and email are trimmed before validation, so whitespace-only
    /// values are rejected rather than stored empty.
    ///
    /// # Errors
    ///
    /// Returns the validation failures, or a hashing error wrapped in
    /// [`CreateUserError::Password`].
    pub fn into_new_user(self) -> Result<NewUser, CreateUserError> {
        let input = CreateUser {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password,
        };
        input.validate()?;
        let password_hash = password::hash_password(&input.password)?;

        Ok(NewUser {
            username: input.username,
            email: input.email,
            password_hash,
        })
    }
}

/// Failure while turning a [`CreateUser`] into a [`NewUser`]
#[derive(Debug, thiserror::Error)]
pub enum CreateUserError {
    #[error("{0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error(transparent)]
    Password(#[from] PasswordError),
}

/// Row ready for insertion, password already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl User {
    /// Checks a candidate password against the stored hash
    ///
    /// # Errors
    ///
    /// Returns an error only if the stored hash is malformed.
    pub fn is_correct_password(&self, candidate: &str) -> Result<bool, PasswordError> {
        password::verify_password(candidate, &self.password_hash)
    }

    /// Number of saved books
    pub fn book_count(&self) -> usize {
        self.saved_books.len()
    }

    /// Whether `book_id` is among the saved books
    pub fn has_saved(&self, book_id: &str) -> bool {
        self.saved_books.iter().any(|id| id == book_id)
    }

    /// Inserts a new user
    ///
    /// # Errors
    ///
    /// Returns an error if the username or email already exists (unique
    /// constraint violation) or the database connection fails.
    pub async fn create(pool: &PgPool, data: NewUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(data.username)
        .bind(data.email)
        .bind(data.password_hash)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Lists every user, oldest first
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC"
        ))
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Finds a user matching both `id` and `username`
    pub async fn find_by_id_and_username(
        pool: &PgPool,
        id: Uuid,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND username = $2"
        ))
        .bind(id)
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Adds `book_id` to the user's saved books unless already present
    ///
    /// Single statement, so concurrent adds of the same ID cannot produce a
    /// duplicate. Returns the updated user, or `None` if no user has `id`.
    pub async fn add_saved_book(
        pool: &PgPool,
        id: Uuid,
        book_id: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET saved_books = CASE
                WHEN $2 = ANY(saved_books) THEN saved_books
                ELSE array_append(saved_books, $2)
            END
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(book_id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Removes every occurrence of `book_id` from the user's saved books
    ///
    /// Returns the updated user, or `None` if no user has `id`.
    pub async fn remove_saved_book(
        pool: &PgPool,
        id: Uuid,
        book_id: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET saved_books = array_remove(saved_books, $2)
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(book_id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_user(username: &str, email: &str, password: &str) -> CreateUser {
        CreateUser {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn user_with_books(books: &[&str]) -> User {
        User {
            id: Uuid::new_v4(),
            username: "amy".to_string(),
            email: "amy@example.com".to_string(),
            password_hash: "hash".to_string(),
            saved_books: books.iter().map(|b| b.to_string()).collect(),
        }
    }

    #[test]
    fn test_create_user_hashes_password() {
        let new_user = create_user("amy", "amy@example.com", "password1")
            .into_new_user()
            .expect("valid input");

        assert_eq!(new_user.username, "amy");
        assert!(new_user.password_hash.starts_with("$argon2id$"));
        assert_ne!(new_user.password_hash, "password1");
    }

    #[test]
    fn test_create_user_rejects_bad_email() {
        let result = create_user("amy", "not-an-email", "password1").into_new_user();
        assert!(matches!(result, Err(CreateUserError::Validation(_))));
    }

    #[test]
    fn test_create_user_rejects_short_password() {
        let result = create_user("amy", "amy@example.com", "1234").into_new_user();

        match result {
            Err(CreateUserError::Validation(errors)) => {
                assert!(errors.field_errors().contains_key("password"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_create_user_rejects_empty_username() {
        let result = create_user("", "amy@example.com", "password1").into_new_user();
        assert!(matches!(result, Err(CreateUserError::Validation(_))));
    }

    #[test]
    fn test_create_user_rejects_whitespace_username() {
        let result = create_user("   ", "amy@example.com", "password1").into_new_user();

        match result {
            Err(CreateUserError::Validation(errors)) => {
                assert!(errors.field_errors().contains_key("username"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_create_user_trims_username_and_email() {
        let new_user = create_user("  amy ", " amy@example.com ", "password1")
            .into_new_user()
            .expect("valid input");

        assert_eq!(new_user.username, "amy");
        assert_eq!(new_user.email, "amy@example.com");
    }

    #[test]
    fn test_is_correct_password() {
        let new_user = create_user("amy", "amy@example.com", "password1")
            .into_new_user()
            .unwrap();
        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            saved_books: Vec::new(),
        };

        assert!(user.is_correct_password("password1").unwrap());
        assert!(!user.is_correct_password("password2").unwrap());
    }

    #[test]
    fn test_book_count_and_membership() {
        let user = user_with_books(&["B1", "B2"]);

        assert_eq!(user.book_count(), 2);
        assert!(user.has_saved("B2"));
        assert!(!user.has_saved("B3"));
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = user_with_books(&[]);
        let json = serde_json::to_value(&user).unwrap();

        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "amy");
    }
}
