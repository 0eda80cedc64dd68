//! Route handlers organized by resource

use serde::Serialize;

pub mod health;
pub mod users;
pub mod tweets;
pub mod comments;
pub mod likes;

/// Confirmation body for update/delete
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Router harness backed by a database that is never reachable.

    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use tower::ServiceExt;

    use crate::db::{ConnectionProvider, DbConfig};
    use crate::http::{build_router, AppState, ServerConfig};

    pub fn offline_app() -> Router {
        let config = DbConfig::new("127.0.0.1", "nobody", "nothing", "nowhere")
            .with_port(9)
            .with_acquire_timeout(Duration::from_millis(200));
        let state = AppState::new(ConnectionProvider::connect_lazy(&config));
        build_router(state, &ServerConfig::default())
    }

    /// Send a request and decode the body as JSON (Null when not JSON).
    pub async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<&str>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_owned())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }
}
