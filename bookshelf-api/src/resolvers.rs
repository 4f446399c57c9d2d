/// Resolver set
///
/// One method per GraphQL operation. Each performs one store call (two for
/// `user` and for `saveBook` with book details) and returns the result or a
/// classified [`ResolverError`]. No state is kept between calls; the store
/// handle and token issuer are injected.
///
/// # Operations
///
/// | Operation    | Kind     | Store calls                         |
/// |--------------|----------|-------------------------------------|
/// | `users`      | Query    | find users                          |
/// | `user`       | Query    | find user, expand saved books       |
/// | `books`      | Query    | find books                          |
/// | `book`       | Query    | find book                           |
/// | `createUser` | Mutation | create user                         |
/// | `login`      | Mutation | find user by email                  |
/// | `saveBook`   | Mutation | (upsert book), set-add saved book   |
/// | `deleteBook` | Mutation | set-remove saved book               |
///
/// # Example
///
/// ```no_run
/// use bookshelf_api::resolvers::Resolvers;
/// use bookshelf_shared::auth::jwt::TokenIssuer;
/// use bookshelf_shared::store::MemoryStore;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let resolvers = Resolvers::new(
///     Arc::new(MemoryStore::new()),
///     TokenIssuer::new("test-secret-key-at-least-32-bytes-long"),
/// );
///
/// let auth = resolvers.create_user("amy", "amy@example.com", "password1").await?;
/// let user = resolvers.save_book(&auth.user.id.to_string(), "B1", None).await?;
/// assert_eq!(user.unwrap().saved_books, vec!["B1".to_string()]);
/// # Ok(())
/// # }
/// ```

use bookshelf_shared::{
    auth::jwt::{JwtError, TokenIssuer},
    models::{
        book::{Book, BookInput},
        user::{CreateUser, User},
    },
    store::{parse_id, validate_book, Store, StoreError},
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Message returned when no user has the email given to `login`
pub const NO_USER_FOUND: &str = "No user found with this email address";

/// Message returned when the password given to `login` is wrong
pub const INCORRECT_CREDENTIALS: &str = "Incorrect credentials";

/// Resolver failure
#[derive(Debug, thiserror::Error)]
pub enum ResolverError {
    /// Unknown email or wrong password; the message is safe to show
    #[error("{0}")]
    Authentication(String),

    /// Store failure, passed through verbatim
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Token could not be signed
    #[error("Failed to issue token: {0}")]
    Token(#[from] JwtError),
}

/// Resolver result type alias
pub type ResolverResult<T> = Result<T, ResolverError>;

/// Token plus the user it identifies
#[derive(Debug, Clone)]
pub struct Auth {
    pub token: String,
    pub user: User,
}

/// A user with its saved-book references expanded
#[derive(Debug, Clone)]
pub struct PopulatedUser {
    pub user: User,
    pub books: Vec<Book>,
}

/// The resolver set
///
/// Cheap to clone; clones share the store handle.
#[derive(Clone)]
pub struct Resolvers {
    store: Arc<dyn Store>,
    issuer: TokenIssuer,
}

impl Resolvers {
    pub fn new(store: Arc<dyn Store>, issuer: TokenIssuer) -> Self {
        Self { store, issuer }
    }

    /// All users
    pub async fn users(&self) -> ResolverResult<Vec<User>> {
        Ok(self.store.find_users().await?)
    }

    /// The user matching both `user_id` and `username`, saved books expanded
    ///
    /// `None` when nothing matches.
    pub async fn user(&self, username: &str, user_id: &str) -> ResolverResult<Option<PopulatedUser>> {
        let id = parse_id(user_id)?;

        let Some(user) = self.store.find_user(id, username).await? else {
            debug!(user_id = %id, "No user matched id and username");
            return Ok(None);
        };

        let books = self.store.find_books_by_ids(&user.saved_books).await?;
        Ok(Some(PopulatedUser { user, books }))
    }

    /// Books saved by `user_id`, or every book when no user is given
    pub async fn books(&self, user_id: Option<&str>) -> ResolverResult<Vec<Book>> {
        let saved_by = match user_id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(raw) => Some(parse_id(raw)?),
            None => None,
        };

        Ok(self.store.find_books(saved_by).await?)
    }

    /// The book with application-level ID `book_id`
    pub async fn book(&self, book_id: &str) -> ResolverResult<Option<Book>> {
        Ok(self.store.find_book(book_id).await?)
    }

    /// Registers a user and logs them straight in
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> ResolverResult<Auth> {
        let user = self
            .store
            .create_user(CreateUser {
                username: username.to_string(),
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;

        let token = self.issuer.sign_token(&user)?;

        info!(user_id = %user.id, username = %user.username, "User created");
        Ok(Auth { token, user })
    }

    /// Exchanges email and password for a token
    ///
    /// # Errors
    ///
    /// [`ResolverError::Authentication`] with [`NO_USER_FOUND`] or
    /// [`INCORRECT_CREDENTIALS`].
    pub async fn login(&self, email: &str, password: &str) -> ResolverResult<Auth> {
        let user = self
            .store
            .find_user_by_email(email)
            .await?
            .ok_or_else(|| ResolverError::Authentication(NO_USER_FOUND.to_string()))?;

        let correct = user
            .is_correct_password(password)
            .map_err(StoreError::Password)?;
        if !correct {
            warn!(user_id = %user.id, "Login rejected: incorrect password");
            return Err(ResolverError::Authentication(
                INCORRECT_CREDENTIALS.to_string(),
            ));
        }

        let token = self.issuer.sign_token(&user)?;

        info!(user_id = %user.id, "User logged in");
        Ok(Auth { token, user })
    }

    /// Adds `book_id` to the user's saved books
    ///
    /// When `book` is given, the book record is written once the reference
    /// is in place so it can be expanded later. Saving an already-saved ID is
    /// a no-op. Returns `None` if no user has `user_id`, in which case nothing
    /// is written.
    pub async fn save_book(
        &self,
        user_id: &str,
        book_id: &str,
        book: Option<BookInput>,
    ) -> ResolverResult<Option<User>> {
        let id = parse_id(user_id)?;
        if let Some(details) = &book {
            validate_book(book_id, details)?;
        }

        let Some(user) = self.store.add_saved_book(id, book_id).await? else {
            debug!(user_id = %id, book_id, "No user to save book for");
            return Ok(None);
        };

        if let Some(details) = book {
            self.store.upsert_book(book_id, details).await?;
        }

        debug!(user_id = %id, book_id, "Saved book");
        Ok(Some(user))
    }

    /// Removes `book_id` from the user's saved books, if present
    ///
    /// Returns `None` if no user has `user_id`.
    pub async fn delete_book(&self, user_id: &str, book_id: &str) -> ResolverResult<Option<User>> {
        let id = parse_id(user_id)?;

        let user = self.store.remove_saved_book(id, book_id).await?;
        debug!(user_id = %id, book_id, found = user.is_some(), "Removed saved book");
        Ok(user)
    }
}
