//! Authentication ports.

use uuid::Uuid;

use crate::domain::Role;

/// Claims carried by a verified access token.
#[derive(Debug, Clone)]
pub struct AccessClaims {
    pub user_id: Uuid,
    pub role: Role,
    pub exp: i64,
}

/// Claims carried by a verified refresh token. Refresh tokens prove identity
/// only; role is re-read from the store when a new access token is minted.
#[derive(Debug, Clone)]
pub struct RefreshClaims {
    pub user_id: Uuid,
    pub exp: i64,
}

/// Token service - mints and verifies the two credential kinds.
pub trait TokenService: Send + Sync {
    /// Mint a short-lived access token encoding identity and role.
    fn mint_access_token(&self, user_id: Uuid, role: Role) -> Result<String, AuthError>;

    /// Mint a longer-lived refresh token, honored only by the renewal path.
    fn mint_refresh_token(&self, user_id: Uuid) -> Result<String, AuthError>;

    /// Verify and decode an access token.
    fn verify_access_token(&self, token: &str) -> Result<AccessClaims, AuthError>;

    /// Verify and decode a refresh token.
    fn verify_refresh_token(&self, token: &str) -> Result<RefreshClaims, AuthError>;
}

/// Password hashing service. One-way and salted; the work factor is pinned
/// by the implementation.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text secret.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a secret against a stored hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Hashing error: {0}")]
    HashingError(String),
}
