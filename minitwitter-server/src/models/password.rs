//! Plaintext password handling and Argon2 hashing
//!
//! The plaintext only ever lives inside [`Password`]; what reaches the
//! database is the PHC-formatted Argon2id hash.

use std::fmt;

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};

use super::ValidationError;

const MIN_PASSWORD_LEN: usize = 8;
const MAX_PASSWORD_LEN: usize = 128;

/// Well-formed Argon2id hash with default cost parameters that matches no
/// password. Checked against when a login names an unknown user so both
/// rejection paths pay for one Argon2 run.
pub const DUMMY_PASSWORD_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$bWluaXR3aXR0ZXItc2FsdA$GDXmMeenjLkCNcxrUTeCe82EO3mxONKcW3w6YOqzQiA";

/// Password hashing failure
#[derive(Debug, thiserror::Error)]
#[error("failed to hash password: {0}")]
pub struct PasswordError(String);

/// Validated plaintext password
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// Create a new password.
    ///
    /// # Rules
    /// - 8 to 128 characters
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "password" });
        }

        let len = s.chars().count();
        if len < MIN_PASSWORD_LEN {
            return Err(ValidationError::TooShort {
                field: "password",
                min: MIN_PASSWORD_LEN,
            });
        }

        if len > MAX_PASSWORD_LEN {
            return Err(ValidationError::TooLong {
                field: "password",
                max: MAX_PASSWORD_LEN,
            });
        }

        Ok(Self(s.to_owned()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Hash with a fresh random salt.
    pub fn hash(&self) -> Result<String, PasswordError> {
        hash_password(&self.0)
    }

    /// Hash on the blocking thread pool so request workers stay free.
    pub async fn hash_async(&self) -> Result<String, PasswordError> {
        let plaintext = self.0.clone();
        tokio::task::spawn_blocking(move || hash_password(&plaintext))
            .await
            .map_err(|e| PasswordError(e.to_string()))?
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Generates a new password hash using argon2.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError(e.to_string()))
}

/// Uses argon2 to verify a candidate against a stored hash.
///
/// An unparseable stored hash never verifies.
pub fn verify_password(stored_hash: &str, candidate: &str) -> bool {
    let hash = match PasswordHash::new(stored_hash) {
        Ok(hash) => hash,
        Err(err) => {
            tracing::error!("failed to parse password hash: {}", err);
            return false;
        }
    };

    Argon2::default()
        .verify_password(candidate.as_bytes(), &hash)
        .is_ok()
}

/// Burn one verification against [`DUMMY_PASSWORD_HASH`]. Always `false`.
pub fn verify_dummy_password(candidate: &str) -> bool {
    verify_password(DUMMY_PASSWORD_HASH, candidate);
    false
}
