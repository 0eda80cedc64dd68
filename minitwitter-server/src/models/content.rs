//! Tweet and comment body validation

use super::ValidationError;

/// Maximum length for tweet content, in characters
const MAX_TWEET_LEN: usize = 280;

/// Maximum length for comment content, in characters
const MAX_COMMENT_LEN: usize = 1000;

fn validate_body(s: &str, field: &'static str, max: usize) -> Result<String, ValidationError> {
    if s.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }

    if s.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }

    Ok(s.to_owned())
}

/// Validated tweet content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TweetContent(String);

impl TweetContent {
    /// Create tweet content.
    ///
    /// # Example
    /// ```
    /// use minitwitter_server::models::TweetContent;
    ///
    /// assert!(TweetContent::new("hello").is_ok());
    /// assert!(TweetContent::new("   ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        validate_body(s, "content", MAX_TWEET_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated comment content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentContent(String);

impl CommentContent {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        validate_body(s, "content", MAX_COMMENT_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
