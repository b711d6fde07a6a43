use std::sync::LazyLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// Verified against when the username is unknown, so a miss costs the same
/// argon2 work as a wrong password.
static DUMMY_HASH: LazyLock<String> = LazyLock::new(|| {
    hash_password("storefront-unknown-user").unwrap_or_else(|_| String::new())
});

/// Hashes `password` with argon2id and a fresh random salt, returning the PHC
/// string that gets persisted.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Constant-time check of `password` against a stored PHC string. A malformed
/// stored hash counts as a mismatch.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        tracing::warn!("Stored password hash could not be parsed");
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Checks `password` against `stored_hash`, or against a throwaway hash when
/// there is no stored one. Always `false` in the latter case.
pub fn verify_or_dummy(password: &str, stored_hash: Option<&str>) -> bool {
    match stored_hash {
        Some(hash) => verify_password(password, hash),
        None => {
            verify_password(password, &DUMMY_HASH);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_and_hides_plaintext() {
        let hash = hash_password("secret123").unwrap();
        assert!(!hash.contains("secret123"));
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("secret123", &hash));
        assert!(!verify_password("secret124", &hash));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let a = hash_password("secret123").unwrap();
        let b = hash_password("secret123").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("secret123", "not-a-hash"));
    }

    #[test]
    fn missing_hash_still_runs_a_verification() {
        assert!(DUMMY_HASH.starts_with("$argon2"));
        assert!(!verify_or_dummy("storefront-unknown-user", None));
        assert!(!verify_or_dummy("secret123", None));

        let hash = hash_password("secret123").unwrap();
        assert!(verify_or_dummy("secret123", Some(&hash)));
    }
}
