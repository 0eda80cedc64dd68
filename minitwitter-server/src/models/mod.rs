//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod account;
pub mod password;
pub mod content;

pub use validation::ValidationError;
pub use account::{Email, Username};
pub use password::{
    hash_password, verify_dummy_password, verify_password, Password, PasswordError,
    DUMMY_PASSWORD_HASH,
};
pub use content::{CommentContent, TweetContent};
