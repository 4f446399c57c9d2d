/// In-process [`Store`] with the same semantics as [`super::PgStore`]
///
/// Each operation takes the lock once, which gives the same per-document
/// atomicity the database provides for set-add and set-remove.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{validate_book, Store, StoreError, StoreResult};
use crate::models::{
    book::{self, Book, BookInput},
    user::{CreateUser, User},
};

#[derive(Debug, Default)]
struct Collections {
    users: Vec<User>,
    books: Vec<Book>,
}

/// Store kept entirely in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.inner.read().await.users.clone())
    }

    async fn find_user(&self, id: Uuid, username: &str) -> StoreResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner
            .users
            .iter()
            .find(|u| u.id == id && u.username == username)
            .cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        let new_user = data.into_new_user()?;

        let mut inner = self.inner.write().await;
        if inner.users.iter().any(|u| u.username == new_user.username) {
            return Err(StoreError::Duplicate {
                field: "username".to_string(),
            });
        }
        if inner.users.iter().any(|u| u.email == new_user.email) {
            return Err(StoreError::Duplicate {
                field: "email".to_string(),
            });
        }

        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            saved_books: Vec::new(),
        };
        inner.users.push(user.clone());

        Ok(user)
    }

    async fn add_saved_book(&self, user_id: Uuid, book_id: &str) -> StoreResult<Option<User>> {
        book::validate_book_id(book_id).map_err(StoreError::Validation)?;

        let mut inner = self.inner.write().await;
        let Some(user) = inner.users.iter_mut().find(|u| u.id == user_id) else {
            return Ok(None);
        };

        if !user.has_saved(book_id) {
            user.saved_books.push(book_id.to_string());
        }

        Ok(Some(user.clone()))
    }

    async fn remove_saved_book(
        &self,
        user_id: Uuid,
        book_id: &str,
    ) -> StoreResult<Option<User>> {
        let mut inner = self.inner.write().await;
        let Some(user) = inner.users.iter_mut().find(|u| u.id == user_id) else {
            return Ok(None);
        };

        user.saved_books.retain(|id| id != book_id);

        Ok(Some(user.clone()))
    }

    async fn upsert_book(&self, book_id: &str, input: BookInput) -> StoreResult<Book> {
        validate_book(book_id, &input)?;

        let mut inner = self.inner.write().await;
        if let Some(existing) = inner.books.iter_mut().find(|b| b.book_id == book_id) {
            let id = existing.id;
            *existing = Book {
                id,
                ..Book::from_input(book_id.to_string(), input)
            };
            return Ok(existing.clone());
        }

        let created = Book::from_input(book_id.to_string(), input);
        inner.books.push(created.clone());
        Ok(created)
    }

    async fn find_books(&self, saved_by: Option<Uuid>) -> StoreResult<Vec<Book>> {
        let inner = self.inner.read().await;

        match saved_by {
            None => {
                let mut books = inner.books.clone();
                books.sort_by(|a, b| {
                    a.title
                        .cmp(&b.title)
                        .then_with(|| a.book_id.cmp(&b.book_id))
                });
                Ok(books)
            }
            Some(user_id) => {
                let references = inner
                    .users
                    .iter()
                    .find(|u| u.id == user_id)
                    .map(|u| u.saved_books.clone())
                    .unwrap_or_default();

                Ok(book::order_by_references(inner.books.clone(), &references))
            }
        }
    }

    async fn find_book(&self, book_id: &str) -> StoreResult<Option<Book>> {
        let inner = self.inner.read().await;
        Ok(inner.books.iter().find(|b| b.book_id == book_id).cloned())
    }

    async fn find_books_by_ids(&self, book_ids: &[String]) -> StoreResult<Vec<Book>> {
        let inner = self.inner.read().await;
        Ok(book::order_by_references(inner.books.clone(), book_ids))
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
