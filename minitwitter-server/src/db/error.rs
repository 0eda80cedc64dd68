//! Database error type

use crate::models::PasswordError;

/// Generic message for failures that carry no usable text
pub const GENERIC_MESSAGE: &str = "Server error";

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Store unreachable, pool exhausted, or credentials rejected
    #[error("connection error: {0}")]
    Connection(#[source] sqlx::Error),

    /// Constraint violation, malformed statement, or row decode failure
    #[error("database error: {0}")]
    Persistence(#[source] sqlx::Error),

    #[error(transparent)]
    Hash(#[from] PasswordError),
}

impl DbError {
    /// Message safe to hand to a client.
    ///
    /// Database-reported errors carry their own message (e.g. a constraint
    /// name); everything else collapses to [`GENERIC_MESSAGE`].
    pub fn client_message(&self) -> String {
        match self {
            Self::Persistence(sqlx::Error::Database(db)) => db.message().to_owned(),
            _ => GENERIC_MESSAGE.to_owned(),
        }
    }

    /// SQLSTATE of a database-reported error, if any.
    pub fn code(&self) -> Option<String> {
        match self {
            Self::Connection(sqlx::Error::Database(db))
            | Self::Persistence(sqlx::Error::Database(db)) => db.code().map(|c| c.into_owned()),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(e: sqlx::Error) -> Self {
        if is_connection_failure(&e) {
            Self::Connection(e)
        } else {
            Self::Persistence(e)
        }
    }
}

/// Classify an sqlx error as a connectivity problem.
///
/// SQLSTATE class 08 is connection exceptions, class 28 is invalid
/// authorization, 3D000 is an unknown database name.
fn is_connection_failure(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Configuration(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => true,
        sqlx::Error::Database(db) => db
            .code()
            .map(|code| code.starts_with("08") || code.starts_with("28") || code == "3D000")
            .unwrap_or(false),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_errors_are_connection_errors() {
        assert!(matches!(
            DbError::from(sqlx::Error::PoolTimedOut),
            DbError::Connection(_)
        ));
        assert!(matches!(
            DbError::from(sqlx::Error::PoolClosed),
            DbError::Connection(_)
        ));
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert!(matches!(DbError::from(sqlx::Error::Io(io)), DbError::Connection(_)));
    }

    #[test]
    fn other_errors_are_persistence_errors() {
        assert!(matches!(
            DbError::from(sqlx::Error::RowNotFound),
            DbError::Persistence(_)
        ));
    }

    #[test]
    fn non_database_errors_use_generic_message() {
        assert_eq!(
            DbError::from(sqlx::Error::PoolTimedOut).client_message(),
            GENERIC_MESSAGE
        );
        assert_eq!(
            DbError::from(sqlx::Error::RowNotFound).client_message(),
            GENERIC_MESSAGE
        );
        assert_eq!(DbError::from(sqlx::Error::RowNotFound).code(), None);
    }
}
