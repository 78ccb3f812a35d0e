use std::fmt;

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use tracing::error;

const MEMORY_COST_KIB: u32 = 19 * 1024;
const ITERATIONS: u32 = 2;
const LANES: u32 = 1;

fn hasher() -> anyhow::Result<Argon2<'static>> {
    let params = Params::new(MEMORY_COST_KIB, ITERATIONS, LANES, None)
        .map_err(|e| anyhow::anyhow!("argon2 params: {e}"))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// A salted Argon2id hash in PHC string form.
///
/// The only ways to get one are hashing a plaintext or loading a stored
/// value, so a plaintext password can never be handed to a repository.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Hashes `plain` with a fresh random salt.
    pub fn hash(plain: &str) -> anyhow::Result<Self> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = hasher()?
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                anyhow::anyhow!(e.to_string())
            })?
            .to_string();
        Ok(Self(hash))
    }

    pub(crate) fn from_stored(hash: String) -> Self {
        Self(hash)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Constant-time comparison of `plain` against this hash.
    pub fn verify(&self, plain: &str) -> anyhow::Result<bool> {
        let parsed = PasswordHash::new(&self.0).map_err(|e| {
            error!(error = %e, "argon2 parse hash error");
            anyhow::anyhow!(e.to_string())
        })?;
        Ok(hasher()?.verify_password(plain.as_bytes(), &parsed).is_ok())
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedPassword(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = HashedPassword::hash(password).expect("hashing should succeed");
        assert_ne!(hash.as_str(), password);
        assert!(hash.as_str().starts_with("$argon2id$"));
        assert!(hash.verify(password).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hash = HashedPassword::hash("correct-horse-battery-staple").unwrap();
        assert!(!hash.verify("wrong-password").expect("verify should not error"));
    }

    #[test]
    fn same_password_gets_a_fresh_salt() {
        let a = HashedPassword::hash("same-password").unwrap();
        let b = HashedPassword::hash("same-password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = HashedPassword::from_stored("not-a-valid-hash".into())
            .verify("anything")
            .unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn debug_output_is_redacted() {
        let hash = HashedPassword::hash("pw").unwrap();
        let shown = format!("{hash:?}");
        assert!(!shown.contains(hash.as_str()));
    }
}
