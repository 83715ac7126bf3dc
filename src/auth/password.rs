use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

use crate::error::{AppError, AppResult};

const MIN_LEN: usize = 8;
const MAX_LEN: usize = 128;

/// Rules a new password must satisfy before it is hashed.
pub fn check_strength(plain: &str) -> AppResult<()> {
    if plain.trim().is_empty() {
        return Err(AppError::validation("Password is Required"));
    }
    if plain.chars().count() < MIN_LEN {
        return Err(AppError::validation("Password must be at least 8 characters"));
    }
    if plain.len() > MAX_LEN {
        return Err(AppError::validation("Password is too long"));
    }
    Ok(())
}

pub fn hash(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| {
            error!(error = %e, "argon2 hash failed");
            anyhow::anyhow!("hash password: {e}")
        })
}

/// `Ok(false)` on mismatch; `Err` only when the stored hash is unreadable.
pub fn verify(plain: &str, stored: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(stored).map_err(|e| {
        error!(error = %e, "stored password hash unreadable");
        anyhow::anyhow!("parse password hash: {e}")
    })?;
    Ok(Argon2::default().verify_password(plain.as_bytes(), &parsed).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let stored = hash("plumber-2024").unwrap();
        assert!(stored.starts_with("$argon2"));
        assert!(verify("plumber-2024", &stored).unwrap());
        assert!(!verify("plumber-2025", &stored).unwrap());
    }

    #[test]
    fn unreadable_hash_is_an_error() {
        assert!(verify("anything", "plain-text").is_err());
    }

    #[test]
    fn strength_rules() {
        assert!(matches!(check_strength("   "), Err(AppError::Validation(_))));
        assert!(matches!(check_strength("short"), Err(AppError::Validation(_))));
        assert!(matches!(check_strength(&"x".repeat(129)), Err(AppError::Validation(_))));
        assert!(check_strength("long enough").is_ok());
    }
}
