/// Book model and database operations
///
/// Books are keyed by an application-level `book_id` (for example a catalogue
/// volume ID) that is distinct from their storage `id`. Users reference books
/// by `book_id` from their `saved_books` set.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE books (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     book_id TEXT NOT NULL CONSTRAINT books_book_id_key UNIQUE,
///     title TEXT NOT NULL,
///     authors TEXT[] NOT NULL DEFAULT '{}',
///     description TEXT NOT NULL DEFAULT '',
///     image TEXT,
///     link TEXT
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

const BOOK_COLUMNS: &str = "id, book_id, title, authors, description, image, link";

/// Longest accepted application-level book ID
pub const MAX_BOOK_ID_LENGTH: usize = 255;

/// A saved-book record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    /// Storage identity
    pub id: Uuid,

    /// Application-level book ID
    pub book_id: String,

    pub title: String,

    pub authors: Vec<String>,

    pub description: String,

    /// Cover image URL
    pub image: Option<String>,

    /// Link to the book's page
    pub link: Option<String>,
}

/// Book details supplied when saving a book
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct BookInput {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,

    #[serde(default)]
    pub authors: Vec<String>,

    #[serde(default)]
    pub description: String,

    #[validate(url(message = "Image must be a URL"))]
    pub image: Option<String>,

    #[validate(url(message = "Link must be a URL"))]
    pub link: Option<String>,
}

/// Checks an application-level book ID
///
/// # Errors
///
/// Returns a message describing why the ID is unusable.
pub fn validate_book_id(book_id: &str) -> Result<(), String> {
    if book_id.trim().is_empty() {
        return Err("bookId is required".to_string());
    }

    if book_id.len() > MAX_BOOK_ID_LENGTH {
        return Err(format!(
            "bookId must be at most {} characters",
            MAX_BOOK_ID_LENGTH
        ));
    }

    Ok(())
}

/// Orders `books` to follow `references`, dropping books not referenced
///
/// References without a matching book are skipped, the way a populated
/// reference to a missing document disappears.
pub fn order_by_references(mut books: Vec<Book>, references: &[String]) -> Vec<Book> {
    let mut ordered = Vec::with_capacity(references.len());

    for reference in references {
        if let Some(pos) = books.iter().position(|b| &b.book_id == reference) {
            ordered.push(books.swap_remove(pos));
        }
    }

    ordered
}

impl Book {
    /// Builds a book from its ID and details, assigning a fresh storage ID
    pub fn from_input(book_id: String, input: BookInput) -> Self {
        Self {
            id: Uuid::new_v4(),
            book_id,
            title: input.title,
            authors: input.authors,
            description: input.description,
            image: input.image,
            link: input.link,
        }
    }

    /// Inserts a book, or refreshes its details if `book_id` already exists
    pub async fn upsert(
        pool: &PgPool,
        book_id: &str,
        input: BookInput,
    ) -> Result<Self, sqlx::Error> {
        let book = sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (book_id, title, authors, description, image, link)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (book_id) DO UPDATE
            SET title = EXCLUDED.title,
                authors = EXCLUDED.authors,
                description = EXCLUDED.description,
                image = EXCLUDED.image,
                link = EXCLUDED.link
            RETURNING {BOOK_COLUMNS}
            "#
        ))
        .bind(book_id)
        .bind(input.title)
        .bind(input.authors)
        .bind(input.description)
        .bind(input.image)
        .bind(input.link)
        .fetch_one(pool)
        .await?;

        Ok(book)
    }

    /// Lists every book
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books ORDER BY title ASC, book_id ASC"
        ))
        .fetch_all(pool)
        .await?;

        Ok(books)
    }

    /// Lists the books saved by user `user_id`, in the order they were saved
    ///
    /// Returns an empty list when the user does not exist.
    pub async fn list_saved_by(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT b.id, b.book_id, b.title, b.authors, b.description, b.image, b.link
            FROM books b
            JOIN users u ON b.book_id = ANY(u.saved_books)
            WHERE u.id = $1
            ORDER BY array_position(u.saved_books, b.book_id)
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(books)
    }

    /// Lists the books whose `book_id` is in `book_ids`
    pub async fn list_by_book_ids(
        pool: &PgPool,
        book_ids: &[String],
    ) -> Result<Vec<Self>, sqlx::Error> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE book_id = ANY($1)"
        ))
        .bind(book_ids)
        .fetch_all(pool)
        .await?;

        Ok(books)
    }

    /// Finds a book by its application-level ID
    pub async fn find_by_book_id(pool: &PgPool, book_id: &str) -> Result<Option<Self>, sqlx::Error> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE book_id = $1"
        ))
        .bind(book_id)
        .fetch_optional(pool)
        .await?;

        Ok(book)
    }
}
