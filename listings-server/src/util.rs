//! Shared utility functions for listings-server

use std::sync::LazyLock;

/// Hash verified when a login names no account, so both paths cost one argon2 run
static DUMMY_HASH: LazyLock<String> =
    LazyLock::new(|| hash_password("no-such-admin").unwrap_or_default());

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    use argon2::password_hash::SaltString;
    use argon2::password_hash::rand_core::OsRng;
    use argon2::{Argon2, PasswordHasher};
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Spend the same argon2 work as a real check; always `false`
pub fn verify_password_dummy(password: &str) -> bool {
    let _ = verify_password(password, &DUMMY_HASH);
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("sopa-del-dia").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("sopa-del-dia", &hash));
        assert!(!verify_password("sopa-del-dia ", &hash));
    }

    #[test]
    fn test_dummy_check_runs_argon2_and_never_matches() {
        assert!(DUMMY_HASH.starts_with("$argon2"));
        assert!(!verify_password_dummy("no-such-admin"));
        assert!(!verify_password_dummy(""));
    }

    #[test]
    fn test_verify_rejects_plaintext_hash() {
        // Legacy rows stored the password itself
        assert!(!verify_password("1234", "1234"));
    }
}
