use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

/// Derive a salted one-way digest from a plaintext password. The salt is
/// randomized per call, so hashing the same input twice yields two different
/// digests that both verify. Output is a PHC string carrying the algorithm
/// tag, work-factor parameters and salt alongside the digest.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let digest = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(digest)
}

/// Check a plaintext candidate against a stored digest, using the salt and
/// parameters embedded in the digest itself — digests recorded under older
/// parameters keep verifying. Errors only on a malformed digest.
pub fn verify_password(plain: &str, digest: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(digest).map_err(|e| {
        error!(error = %e, "malformed password digest");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let digest = hash_password(password).expect("hashing should succeed");
        assert!(verify_password(password, &digest).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let digest = hash_password("correct-horse-battery-staple").expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &digest).expect("verify should not error"));
    }

    #[test]
    fn same_password_hashes_to_different_digests() {
        let first = hash_password("repeat-after-me").unwrap();
        let second = hash_password("repeat-after-me").unwrap();
        assert_ne!(first, second);
        assert!(verify_password("repeat-after-me", &first).unwrap());
        assert!(verify_password("repeat-after-me", &second).unwrap());
    }

    #[test]
    fn verify_errors_on_malformed_digest() {
        let err = verify_password("anything", "not-a-valid-digest").unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}
