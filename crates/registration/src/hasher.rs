//! Credential hashing.

use crate::error::RegistrationError;

/// Fixed bcrypt work factor for registration hashing.
pub const BCRYPT_COST: u32 = 10;

/// One-way, salted hashing of a plaintext credential.
///
/// Salting is per call; hashing the same secret twice yields
/// different digests.
pub trait CredentialHasher: Send + Sync {
    /// Hashes a plaintext secret.
    fn hash(&self, secret: &str) -> Result<String, RegistrationError>;

    /// Verifies a plaintext secret against a stored hash.
    fn verify(&self, secret: &str, hash: &str) -> bool;
}

/// Production hasher backed by bcrypt at [`BCRYPT_COST`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BcryptHasher;

impl BcryptHasher {
    /// Creates a new bcrypt hasher.
    pub fn new() -> Self {
        Self
    }
}

impl CredentialHasher for BcryptHasher {
    fn hash(&self, secret: &str) -> Result<String, RegistrationError> {
        bcrypt::hash(secret, BCRYPT_COST)
            .map_err(|e| RegistrationError::UserCreationFailed(format!("credential hash: {e}")))
    }

    fn verify(&self, secret: &str, hash: &str) -> bool {
        bcrypt::verify(secret, hash).unwrap_or(false)
    }
}

/// Constant-cost hasher for tests. Never use outside tests: the
/// digest is trivially reversible.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainHasher;

impl PlainHasher {
    /// Creates a new plain hasher.
    pub fn new() -> Self {
        Self
    }
}

impl CredentialHasher for PlainHasher {
    fn hash(&self, secret: &str) -> Result<String, RegistrationError> {
        Ok(format!("plain${secret}"))
    }

    fn verify(&self, secret: &str, hash: &str) -> bool {
        hash == format!("plain${secret}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bcrypt_hash_verifies() {
        let hasher = BcryptHasher::new();
        let hash = hasher.hash("s3cret-pw").unwrap();
        assert!(hasher.verify("s3cret-pw", &hash));
        assert!(!hasher.verify("wrong-pw", &hash));
    }

    #[test]
    fn bcrypt_salts_per_call() {
        let hasher = BcryptHasher::new();
        let a = hasher.hash("s3cret-pw").unwrap();
        let b = hasher.hash("s3cret-pw").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn bcrypt_hash_is_not_plaintext() {
        let hasher = BcryptHasher::new();
        let hash = hasher.hash("s3cret-pw").unwrap();
        assert!(!hash.contains("s3cret-pw"));
    }

    #[test]
    fn plain_hasher_roundtrip() {
        let hasher = PlainHasher::new();
        let hash = hasher.hash("s3cret-pw").unwrap();
        assert!(hasher.verify("s3cret-pw", &hash));
        assert!(!hasher.verify("other", &hash));
    }
}
