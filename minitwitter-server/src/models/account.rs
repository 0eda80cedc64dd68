//! Username and email validation

use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationError;

/// Maximum length for usernames
const MAX_USERNAME_LEN: usize = 50;

/// Maximum length for email addresses (RFC 5321 path limit)
const MAX_EMAIL_LEN: usize = 254;

/// Letters, digits and underscores only
static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("invalid username regex"));

/// One `@`, non-empty local part, dotted domain without spaces
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$").expect("invalid email regex")
});

/// Validated username
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Create a new username.
    ///
    /// # Rules
    /// - 1 to 50 characters
    /// - ASCII letters, digits and underscores
    ///
    /// # Example
    /// ```
    /// use minitwitter_server::models::Username;
    ///
    /// assert!(Username::new("ada_lovelace").is_ok());
    /// assert!(Username::new("ada lovelace").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "username" });
        }

        if s.len() > MAX_USERNAME_LEN {
            return Err(ValidationError::TooLong {
                field: "username",
                max: MAX_USERNAME_LEN,
            });
        }

        if !USERNAME_RE.is_match(s) {
            return Err(ValidationError::InvalidFormat {
                field: "username",
                reason: "must contain only letters, digits and underscores",
            });
        }

        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validated email address
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Create a new email address. Surrounding whitespace is trimmed.
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "email" });
        }

        if s.len() > MAX_EMAIL_LEN {
            return Err(ValidationError::TooLong {
                field: "email",
                max: MAX_EMAIL_LEN,
            });
        }

        if !EMAIL_RE.is_match(s) {
            return Err(ValidationError::InvalidFormat {
                field: "email",
                reason: "must look like name@example.com",
            });
        }

        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
