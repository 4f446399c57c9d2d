/// JWT token issuance and validation module
///
/// This module provides the token issuer used by the resolver layer to log a
/// user in after registration or a successful password check. Tokens are
/// signed using HS256 (HMAC-SHA256) and carry the user's identity.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256)
/// - **Expiration**: Configurable (default 2 hours)
/// - **Validation**: Signature, expiration, and issuer checks
/// - **Secret Management**: Secrets should be at least 32 bytes (256 bits)
///
/// Validation is not performed by any resolver; `validate_token` exists for
/// the transport layer that authenticates incoming requests.
///
/// # Example
///
/// ```
/// use bookshelf_shared::auth::jwt::{create_token, validate_token, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
///
/// let claims = Claims::new(user_id, "amy".to_string(), "amy@example.com".to_string());
/// let token = create_token(&claims, "your-secret-key")?;
///
/// let validated_claims = validate_token(&token, "your-secret-key")?;
/// assert_eq!(validated_claims.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::User;

/// Issuer claim written into and required from every token
pub const ISSUER: &str = "bookshelf";

/// Default token lifetime
pub const DEFAULT_EXPIRATION_HOURS: i64 = 2;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Invalid issuer
    #[error("Invalid issuer: expected {expected}")]
    InvalidIssuer { expected: String },
}

/// JWT claims structure
///
/// # Standard Claims
///
/// - `sub`: Subject (user ID)
/// - `iss`: Issuer (always "bookshelf")
/// - `iat`: Issued at timestamp
/// - `exp`: Expiration timestamp
/// - `nbf`: Not before timestamp
///
/// # Custom Claims
///
/// - `username`: Username at issue time
/// - `email`: Email address at issue time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - User ID
    pub sub: Uuid,

    /// Issuer - Always "bookshelf"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Username (custom claim)
    pub username: String,

    /// Email (custom claim)
    pub email: String,
}

impl Claims {
    /// Creates new claims with the default two hour expiration
    pub fn new(user_id: Uuid, username: String, email: String) -> Self {
        Self::with_expiration(
            user_id,
            username,
            email,
            Duration::hours(DEFAULT_EXPIRATION_HOURS),
        )
    }

    /// Creates claims with custom expiration
    ///
    /// # Example
    ///
    /// ```
    /// use bookshelf_shared::auth::jwt::Claims;
    /// use chrono::Duration;
    /// use uuid::Uuid;
    ///
    /// let claims = Claims::with_expiration(
    ///     Uuid::new_v4(),
    ///     "amy".to_string(),
    ///     "amy@example.com".to_string(),
    ///     Duration::minutes(15),
    /// );
    /// assert!(claims.exp > claims.iat);
    /// ```
    pub fn with_expiration(
        user_id: Uuid,
        username: String,
        email: String,
        expires_in: Duration,
    ) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
            username,
            email,
        }
    }
}

/// Creates a JWT token from claims
///
/// Signs the token using HS256 with the provided secret.
///
/// # Errors
///
/// Returns `JwtError::CreateError` if token creation fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a JWT token and extracts claims
///
/// Verifies:
/// - Signature is valid
/// - Token hasn't expired
/// - Issuer is "bookshelf"
/// - Token is not used before nbf time
///
/// # Errors
///
/// Returns error if the signature is invalid, the token has expired, the
/// issuer doesn't match, or the token is malformed.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer {
            expected: ISSUER.to_string(),
        },
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

/// Token issuer collaborator
///
/// Holds the signing secret and token lifetime so resolvers can sign a
/// credential for a user without knowing either.
#[derive(Clone)]
pub struct TokenIssuer {
    secret: String,
    expires_in: Duration,
}

impl TokenIssuer {
    /// Creates an issuer with the default two hour lifetime
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            expires_in: Duration::hours(DEFAULT_EXPIRATION_HOURS),
        }
    }

    /// Overrides the token lifetime
    pub fn with_expiration(mut self, expires_in: Duration) -> Self {
        self.expires_in = expires_in;
        self
    }

    /// Signs a token identifying `user`
    ///
    /// # Example
    ///
    /// ```
    /// use bookshelf_shared::auth::jwt::TokenIssuer;
    /// use bookshelf_shared::models::user::User;
    /// use uuid::Uuid;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let issuer = TokenIssuer::new("test-secret-key-at-least-32-bytes-long");
    /// let user = User {
    ///     id: Uuid::new_v4(),
    ///     username: "amy".to_string(),
    ///     email: "amy@example.com".to_string(),
    ///     password_hash: "$argon2id$...".to_string(),
    ///     saved_books: Vec::new(),
    /// };
    ///
    /// let token = issuer.sign_token(&user)?;
    /// assert_eq!(issuer.verify(&token)?.sub, user.id);
    /// # Ok(())
    /// # }
    /// ```
    pub fn sign_token(&self, user: &User) -> Result<String, JwtError> {
        let claims = Claims::with_expiration(
            user.id,
            user.username.clone(),
            user.email.clone(),
            self.expires_in,
        );
        create_token(&claims, &self.secret)
    }

    /// Validates a token signed by this issuer
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        validate_token(token, &self.secret)
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("secret", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "amy".to_string(),
            email: "amy@example.com".to_string(),
            password_hash: "hash".to_string(),
            saved_books: Vec::new(),
        }
    }

    #[test]
    fn test_claims_creation() {
        let user_id = Uuid::new_v4();

        let claims = Claims::new(user_id, "amy".to_string(), "amy@example.com".to_string());

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss, "bookshelf");
        assert_eq!(claims.username, "amy");
        assert_eq!(claims.exp - claims.iat, 2 * 3600);
    }

    #[test]
    fn test_create_and_validate_token() {
        let user_id = Uuid::new_v4();

        let claims = Claims::new(user_id, "amy".to_string(), "amy@example.com".to_string());
        let token = create_token(&claims, SECRET).expect("Should create token");

        let validated = validate_token(&token, SECRET).expect("Should validate token");
        assert_eq!(validated.sub, user_id);
        assert_eq!(validated.email, "amy@example.com");
        assert_eq!(validated.iss, "bookshelf");
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let claims = Claims::new(Uuid::new_v4(), "amy".to_string(), "a@b.co".to_string());
        let token = create_token(&claims, "secret1").expect("Should create token");

        let result = validate_token(&token, "wrong-secret");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_expired_token() {
        let claims = Claims::with_expiration(
            Uuid::new_v4(),
            "amy".to_string(),
            "amy@example.com".to_string(),
            Duration::seconds(-3600),
        );

        let token = create_token(&claims, SECRET).expect("Should create token");
        let result = validate_token(&token, SECRET);

        assert!(matches!(result.unwrap_err(), JwtError::Expired));
    }

    #[test]
    fn test_validate_garbage_token() {
        let result = validate_token("not.a.token", SECRET);
        assert!(matches!(result.unwrap_err(), JwtError::ValidationError(_)));
    }

    #[test]
    fn test_issuer_signs_user_identity() {
        let issuer = TokenIssuer::new(SECRET);
        let user = test_user();

        let token = issuer.sign_token(&user).unwrap();
        assert!(!token.is_empty());

        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.username, user.username);
        assert_eq!(claims.email, user.email);
    }

    #[test]
    fn test_issuer_custom_expiration() {
        let issuer = TokenIssuer::new(SECRET).with_expiration(Duration::minutes(5));
        let token = issuer.sign_token(&test_user()).unwrap();

        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, 300);
    }

    #[test]
    fn test_issuer_debug_redacts_secret() {
        let issuer = TokenIssuer::new(SECRET);
        let debug = format!("{:?}", issuer);
        assert!(!debug.contains(SECRET));
    }
}
