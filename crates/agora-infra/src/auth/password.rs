//! Bcrypt password hashing implementation.

use agora_core::ports::{AuthError, PasswordService};

/// Work factor for every hash this service produces. Pinned so hashes are
/// interchangeable across deployments; do not bump without a migration plan
/// for existing credentials.
const BCRYPT_COST: u32 = 10;

/// Bcrypt-based password service.
pub struct BcryptPasswordService;

impl BcryptPasswordService {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BcryptPasswordService {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordService for BcryptPasswordService {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        bcrypt::hash(password, BCRYPT_COST).map_err(|e| AuthError::HashingError(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        bcrypt::verify(password, hash).map_err(|e| AuthError::HashingError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let service = BcryptPasswordService::new();
        let password = "secure_password_123";

        let hash = service.hash(password).unwrap();
        assert!(service.verify(password, &hash).unwrap());
        assert!(!service.verify("wrong_password", &hash).unwrap());
    }

    #[test]
    fn hash_carries_pinned_cost() {
        let service = BcryptPasswordService::new();
        let hash = service.hash("pw").unwrap();

        // bcrypt encodes the cost in the modular crypt header.
        assert!(hash.starts_with("$2b$10$"), "unexpected header: {hash}");
    }

    #[test]
    fn hashes_are_salted() {
        let service = BcryptPasswordService::new();
        let a = service.hash("same").unwrap();
        let b = service.hash("same").unwrap();

        assert_ne!(a, b);
        assert!(service.verify("same", &a).unwrap());
        assert!(service.verify("same", &b).unwrap());
    }
}
