/// Data models for Bookshelf
///
/// # Models
///
/// - `user`: User accounts with their saved-book references
/// - `book`: Saved-book records keyed by application-level book ID
///
/// Each model carries its own PostgreSQL queries; callers normally go through
/// the [`crate::store::Store`] trait rather than calling them directly.

pub mod book;
pub mod user;
