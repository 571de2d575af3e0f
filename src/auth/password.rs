use anyhow::Context;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

/// Argon2id PHC string for `plain`, salted from the OS rng.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|phc| phc.to_string())
        .map_err(|e| anyhow::anyhow!("argon2 hash: {e}"))
}

/// `Ok(false)` on mismatch; `Err` only when the stored digest is not a PHC string.
pub fn verify_password(plain: &str, stored: &str) -> anyhow::Result<bool> {
    let parsed =
        PasswordHash::new(stored).map_err(|e| anyhow::anyhow!("stored digest unreadable: {e}"))?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

// Hashing takes tens of milliseconds of CPU; run it on the blocking pool.

pub async fn hash_password_blocking(plain: String) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&plain))
        .await
        .context("join hash_password task")?
}

pub async fn verify_password_blocking(plain: String, stored: String) -> anyhow::Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&plain, &stored))
        .await
        .context("join verify_password task")?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_digest_is_argon2id_and_only_opens_with_its_password() {
        let stored = hash_password("pw").unwrap();
        assert!(stored.starts_with("$argon2id$"));
        assert!(verify_password("pw", &stored).unwrap());
        assert!(!verify_password("pW", &stored).unwrap());
        assert!(!verify_password("", &stored).unwrap());
    }

    #[test]
    fn two_users_with_the_same_password_get_different_digests() {
        let ann = hash_password("hunter2").unwrap();
        let bob = hash_password("hunter2").unwrap();
        assert_ne!(ann, bob);
        assert!(verify_password("hunter2", &ann).unwrap());
        assert!(verify_password("hunter2", &bob).unwrap());
    }

    #[test]
    fn corrupt_stored_digest_is_an_error_not_a_mismatch() {
        let err = verify_password("anything", "plaintext-left-in-the-column").unwrap_err();
        assert!(err.to_string().contains("stored digest unreadable"));
    }

    #[tokio::test]
    async fn blocking_wrappers_agree_with_sync_versions() {
        let stored = hash_password_blocking("pw".into()).await.unwrap();
        assert!(verify_password_blocking("pw".into(), stored.clone()).await.unwrap());
        assert!(!verify_password_blocking("nope".into(), stored).await.unwrap());
    }
}
