//! Database layer - connection provider, schema and entity gateways
//!
//! # Design Principles
//!
//! - One pooled connection per gateway operation, released on every exit path
//! - Each operation is a single SQL statement
//! - Rely on DB constraints for referential integrity - no check-then-insert

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repos;

pub use error::DbError;
pub use pool::{ConnectionProvider, DbConfig};
pub use repos::*;
