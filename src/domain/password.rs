use crate::config::CONFIG;
use crate::error::PantryError;
use std::fmt;
use tracing::warn;

/// Salted bcrypt hash of an account password.
///
/// Only constructible from plaintext (or from a row already in storage).
/// There is no accessor for the hash and no `Serialize` impl, so the value
/// cannot leak into API output.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash `plaintext` with the configured work factor.
    pub fn new(plaintext: &str) -> Result<Self, PantryError> {
        Self::with_cost(plaintext, CONFIG.bcrypt_cost)
    }

    /// Fails with `BcryptError::Truncation` past bcrypt's 72-byte input limit.
    pub fn with_cost(plaintext: &str, cost: u32) -> Result<Self, PantryError> {
        let hashed = bcrypt::non_truncating_hash(plaintext.as_bytes(), cost)?;
        Ok(Self(hashed))
    }

    /// Constant-time check of `candidate` against the stored hash.
    /// Candidates longer than 72 bytes never match.
    pub fn verify(&self, candidate: &str) -> bool {
        match bcrypt::non_truncating_verify(candidate.as_bytes(), &self.0) {
            Ok(matched) => matched,
            Err(bcrypt::BcryptError::Truncation(_)) => false,
            Err(e) => {
                warn!(error = %e, "stored password hash could not be parsed");
                false
            }
        }
    }

    pub(crate) fn from_stored(hash: String) -> Self {
        Self(hash)
    }

    pub(crate) fn as_stored(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    #[test]
    fn verify_accepts_only_the_hashed_plaintext() {
        let hash = PasswordHash::with_cost("secret123", TEST_COST).unwrap();
        assert!(hash.verify("secret123"));
        assert!(!hash.verify("wrong"));
        assert!(!hash.verify(""));
        assert!(!hash.verify("secret1234"));
    }

    #[test]
    fn passwords_past_72_bytes_are_rejected_not_truncated() {
        let long = format!("{}A", "x".repeat(72));
        let err = PasswordHash::with_cost(&long, TEST_COST).unwrap_err();
        assert!(matches!(
            err,
            PantryError::Hashing(bcrypt::BcryptError::Truncation(_))
        ));
        assert!(err.is_validation());

        let at_limit = "x".repeat(72);
        let hash = PasswordHash::with_cost(&at_limit, TEST_COST).unwrap();
        assert!(hash.verify(&at_limit));
        assert!(!hash.verify(&format!("{at_limit}B")));
    }

    #[test]
    fn hashing_is_salted() {
        let a = PasswordHash::with_cost("same", TEST_COST).unwrap();
        let b = PasswordHash::with_cost("same", TEST_COST).unwrap();
        assert_ne!(a, b);
        assert!(a.verify("same") && b.verify("same"));
    }

    #[test]
    fn stored_hash_is_never_plaintext() {
        let hash = PasswordHash::with_cost("secret123", TEST_COST).unwrap();
        assert!(!hash.as_stored().contains("secret123"));
        assert!(hash.as_stored().starts_with("$2"));
    }

    #[test]
    fn debug_output_is_redacted() {
        let hash = PasswordHash::with_cost("secret123", TEST_COST).unwrap();
        let rendered = format!("{hash:?}");
        assert_eq!(rendered, "PasswordHash(<redacted>)");
    }

    #[test]
    fn malformed_stored_hash_never_verifies() {
        let hash = PasswordHash::from_stored("not-a-bcrypt-hash".to_string());
        assert!(!hash.verify("not-a-bcrypt-hash"));
    }
}
