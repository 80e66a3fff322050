//! Password hashing for user accounts.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use tracing::{debug, error, instrument};

use crate::error::BookstoreError;

/// Hashes a plain-text password with Argon2 and a random salt.
///
/// # Errors
/// `InvalidArgument` for an empty password, `Internal` if hashing itself fails.
#[instrument(skip(password))]
pub fn hash_password(password: &str) -> Result<String, BookstoreError> {
    if password.is_empty() {
        return Err(BookstoreError::invalid("password cannot be empty"));
    }
    let salt = SaltString::generate(&mut OsRng);
    match Argon2::default().hash_password(password.as_bytes(), &salt) {
        Ok(hash) => {
            debug!("Password hashed");
            Ok(hash.to_string())
        }
        Err(e) => {
            error!(error = %e, "Password hashing failed");
            Err(BookstoreError::Internal(format!("password hashing failed: {e}")))
        }
    }
}

/// Checks a plain-text password against a stored hash.
///
/// Returns `Ok(false)` on a mismatch; errors are reserved for unreadable hashes.
#[instrument(skip(stored_hash, password))]
pub fn verify_password(stored_hash: &str, password: &str) -> Result<bool, BookstoreError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| {
        error!(error = %e, "Stored password hash is malformed");
        BookstoreError::Internal(format!("invalid stored password hash: {e}"))
    })?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => {
            debug!("Password mismatch");
            Ok(false)
        }
        Err(e) => Err(BookstoreError::Internal(format!("password verification failed: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("hunter2").unwrap();
        assert_ne!(hash, "hunter2");
        assert!(verify_password(&hash, "hunter2").unwrap());
        assert!(!verify_password(&hash, "hunter3").unwrap());
    }

    #[test]
    fn empty_password_is_rejected() {
        assert!(matches!(hash_password(""), Err(BookstoreError::InvalidArgument(_))));
    }

    #[test]
    fn garbage_hash_is_an_internal_error() {
        assert!(matches!(
            verify_password("not-a-hash", "x"),
            Err(BookstoreError::Internal(_))
        ));
    }
}
