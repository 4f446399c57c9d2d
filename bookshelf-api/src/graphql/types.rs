//! GraphQL object types
//!
//! Thin wrappers over the shared models so the shared crate stays free of
//! GraphQL concerns.

use async_graphql::{ErrorExtensions, InputObject, Object, ID};
use bookshelf_shared::models::{book, user};

use crate::resolvers::{self, ResolverError};

/// GraphQL `User`
pub struct User {
    inner: user::User,
    books: Option<Vec<book::Book>>,
}

impl From<user::User> for User {
    fn from(inner: user::User) -> Self {
        Self { inner, books: None }
    }
}

impl From<resolvers::PopulatedUser> for User {
    fn from(populated: resolvers::PopulatedUser) -> Self {
        Self {
            inner: populated.user,
            books: Some(populated.books),
        }
    }
}

#[Object]
impl User {
    #[graphql(name = "_id")]
    async fn id(&self) -> ID {
        ID(self.inner.id.to_string())
    }

    async fn username(&self) -> &str {
        &self.inner.username
    }

    async fn email(&self) -> &str {
        &self.inner.email
    }

    /// Saved book IDs, in the order they were saved
    async fn saved_books(&self) -> Vec<String> {
        self.inner.saved_books.clone()
    }

    async fn book_count(&self) -> i32 {
        i32::try_from(self.inner.book_count()).unwrap_or(i32::MAX)
    }

    /// Saved books expanded to full records; null unless the operation
    /// populated them
    async fn books(&self) -> Option<Vec<Book>> {
        self.books
            .as_ref()
            .map(|books| books.iter().cloned().map(Book::from).collect())
    }
}

/// GraphQL `Book`
pub struct Book(book::Book);

impl From<book::Book> for Book {
    fn from(inner: book::Book) -> Self {
        Self(inner)
    }
}

#[Object]
impl Book {
    #[graphql(name = "_id")]
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn book_id(&self) -> &str {
        &self.0.book_id
    }

    async fn title(&self) -> &str {
        &self.0.title
    }

    async fn authors(&self) -> Vec<String> {
        self.0.authors.clone()
    }

    async fn description(&self) -> &str {
        &self.0.description
    }

    async fn image(&self) -> Option<&str> {
        self.0.image.as_deref()
    }

    async fn link(&self) -> Option<&str> {
        self.0.link.as_deref()
    }
}

/// GraphQL `Auth`
pub struct Auth(resolvers::Auth);

impl From<resolvers::Auth> for Auth {
    fn from(inner: resolvers::Auth) -> Self {
        Self(inner)
    }
}

#[Object]
impl Auth {
    async fn token(&self) -> &str {
        &self.0.token
    }

    async fn user(&self) -> User {
        User::from(self.0.user.clone())
    }
}

/// Book details accepted by `saveBook`
#[derive(InputObject)]
#[graphql(name = "BookInput")]
pub struct BookInput {
    pub title: String,

    #[graphql(default)]
    pub authors: Vec<String>,

    #[graphql(default)]
    pub description: String,

    pub image: Option<String>,

    pub link: Option<String>,
}

impl From<BookInput> for book::BookInput {
    fn from(input: BookInput) -> Self {
        Self {
            title: input.title,
            authors: input.authors,
            description: input.description,
            image: input.image,
            link: input.link,
        }
    }
}

impl ErrorExtensions for ResolverError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| match self {
            ResolverError::Authentication(_) => e.set("code", "UNAUTHENTICATED"),
            ResolverError::Store(err) => {
                e.set("code", "STORE_ERROR");
                e.set("kind", err.kind());
            }
            ResolverError::Token(_) => e.set("code", "INTERNAL_SERVER_ERROR"),
        })
    }
}
