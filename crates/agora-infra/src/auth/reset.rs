//! Single-use, time-limited password-reset tokens.
//!
//! The raw token leaves this module exactly once, as the return value of
//! [`ResetTokenVault::issue`]; only its SHA-256 digest and an absolute
//! expiry instant are persisted on the user record. Redemption clears both
//! fields, so a raw token cannot be replayed.

use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};

use agora_core::domain::User;
use agora_core::error::DomainError;
use agora_core::ports::{BaseRepository, PasswordService, UserRepository};

/// Entropy of a raw reset token.
const RESET_TOKEN_BYTES: usize = 20;

/// How long an issued token stays redeemable.
const RESET_TOKEN_TTL_HOURS: i64 = 1;

/// Issues and redeems password-reset tokens.
#[derive(Clone)]
pub struct ResetTokenVault {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
}

impl ResetTokenVault {
    pub fn new(users: Arc<dyn UserRepository>, passwords: Arc<dyn PasswordService>) -> Self {
        Self { users, passwords }
    }

    /// Issue a reset token for the account registered under `email`.
    /// Returns the raw, hex-encoded token; delivering it is the caller's
    /// problem.
    pub async fn issue(&self, email: &str) -> Result<String, DomainError> {
        let mut user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| DomainError::not_found("user", email))?;

        let mut bytes = [0u8; RESET_TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        let raw = hex::encode(bytes);

        user.reset_password_token = Some(Self::digest(&raw));
        user.reset_password_expire = Some(Utc::now() + TimeDelta::hours(RESET_TOKEN_TTL_HOURS));
        user.updated_at = Utc::now();
        self.users.save(user).await?;

        Ok(raw)
    }

    /// Redeem a raw token: the stored digest must match and must not have
    /// expired. On success the new secret is hashed onto the user, both
    /// reset fields are cleared, and the updated user is returned.
    pub async fn redeem(&self, raw: &str, new_password: &str) -> Result<User, DomainError> {
        let digest = Self::digest(raw);

        let mut user = self
            .users
            .find_by_reset_digest(&digest, Utc::now())
            .await?
            .ok_or(DomainError::InvalidResetToken)?;

        user.set_password(new_password, self.passwords.as_ref())?;
        user.reset_password_token = None;
        user.reset_password_expire = None;

        Ok(self.users.save(user).await?)
    }

    /// SHA-256 hex digest of a raw token, the only form ever persisted.
    pub fn digest(raw: &str) -> String {
        hex::encode(Sha256::digest(raw.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::BcryptPasswordService;
    use crate::database::memory::InMemoryUserRepository;
    use agora_core::ports::BaseRepository;

    async fn vault_with_user(email: &str) -> (ResetTokenVault, Arc<InMemoryUserRepository>) {
        let users = Arc::new(InMemoryUserRepository::new());
        let passwords = Arc::new(BcryptPasswordService::new());

        let hash = passwords.hash("original-password").unwrap();
        let user = User::new("tester".into(), email.into(), "Tester".into(), hash);
        users.save(user).await.unwrap();

        (ResetTokenVault::new(users.clone(), passwords), users)
    }

    #[tokio::test]
    async fn issue_returns_hex_and_stores_only_digest() {
        let (vault, users) = vault_with_user("a@example.com").await;

        let raw = vault.issue("a@example.com").await.unwrap();

        assert_eq!(raw.len(), RESET_TOKEN_BYTES * 2);
        assert!(raw.chars().all(|c| c.is_ascii_hexdigit()));

        let stored = users.find_by_email("a@example.com").await.unwrap().unwrap();
        assert_eq!(stored.reset_password_token, Some(ResetTokenVault::digest(&raw)));
        assert_ne!(stored.reset_password_token, Some(raw.clone()));
        assert!(stored.reset_password_expire.unwrap() > Utc::now());
    }

    #[tokio::test]
    async fn issue_unknown_email_is_not_found() {
        let (vault, _) = vault_with_user("a@example.com").await;

        let result = vault.issue("nobody@example.com").await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn redeem_sets_password_and_is_single_use() {
        let (vault, users) = vault_with_user("a@example.com").await;
        let passwords = BcryptPasswordService::new();

        let raw = vault.issue("a@example.com").await.unwrap();
        let user = vault.redeem(&raw, "brand-new-secret").await.unwrap();

        assert!(passwords
            .verify("brand-new-secret", &user.password_hash)
            .unwrap());
        assert_eq!(user.reset_password_token, None);
        assert_eq!(user.reset_password_expire, None);

        let stored = users.find_by_email("a@example.com").await.unwrap().unwrap();
        assert_eq!(stored.reset_password_token, None);

        // Replaying the same raw value must fail: redemption cleared the digest.
        let replay = vault.redeem(&raw, "another-secret").await;
        assert!(matches!(replay, Err(DomainError::InvalidResetToken)));
    }

    #[tokio::test]
    async fn redeem_expired_token_fails() {
        let (vault, users) = vault_with_user("a@example.com").await;

        let raw = vault.issue("a@example.com").await.unwrap();

        let mut user = users.find_by_email("a@example.com").await.unwrap().unwrap();
        user.reset_password_expire = Some(Utc::now() - TimeDelta::minutes(1));
        users.save(user).await.unwrap();

        let result = vault.redeem(&raw, "whatever").await;
        assert!(matches!(result, Err(DomainError::InvalidResetToken)));
    }

    #[tokio::test]
    async fn redeem_garbage_token_fails() {
        let (vault, _) = vault_with_user("a@example.com").await;

        let result = vault.redeem("deadbeef", "whatever").await;
        assert!(matches!(result, Err(DomainError::InvalidResetToken)));
    }
}
