//! minitwitter-server: HTTP backend for a minimal social network
//!
//! Users, tweets, comments and likes stored in PostgreSQL, exposed as
//! JSON CRUD endpoints.

pub mod db;
pub mod http;
pub mod models;

pub use db::{ConnectionProvider, DbConfig, DbError};
pub use http::{build_router, run_server, ApiError, AppState, ServerConfig};
