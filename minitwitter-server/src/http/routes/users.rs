//! User endpoints and login

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::repos::{NewUser, User, UserPatch, UserRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, ValidId};
use crate::http::routes::MessageResponse;
use crate::http::server::AppState;
use crate::models::{verify_dummy_password, Email, Password, Username, ValidationError};

/// Create user request
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl CreateUserRequest {
    fn validate(self) -> Result<NewUser, ValidationError> {
        Ok(NewUser {
            username: Username::new(&self.username)?,
            email: Email::new(&self.email)?,
            password: Password::new(&self.password)?,
            is_admin: self.is_admin,
        })
    }
}

/// Update user request; absent fields stay unchanged
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub is_admin: Option<bool>,
}

impl UpdateUserRequest {
    fn validate(self) -> Result<UserPatch, ValidationError> {
        Ok(UserPatch {
            username: self.username.as_deref().map(Username::new).transpose()?,
            email: self.email.as_deref().map(Email::new).transpose()?,
            password: self.password.as_deref().map(Password::new).transpose()?,
            is_admin: self.is_admin,
        })
    }
}

/// Login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// User response; the password hash is never serialized
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            is_admin: u.is_admin,
            created_at: u.created_at.to_rfc3339(),
        }
    }
}

/// POST /users - create a new user
async fn create_user(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let new = req.validate()?;
    let user = UserRepo::new(&state.db).create(new).await?;

    tracing::info!(user_id = user.id, "user created");
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// PUT /users/{id} - partial update
async fn update_user(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let patch = req.validate()?;
    UserRepo::new(&state.db).update(id, patch).await?;

    Ok(Json(MessageResponse::new("User updated successfully.")))
}

/// DELETE /users/{id}
async fn delete_user(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<MessageResponse>, ApiError> {
    UserRepo::new(&state.db).delete(id).await?;

    Ok(Json(MessageResponse::new("User deleted successfully.")))
}

/// GET /users/{id}
async fn get_user(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<UserResponse>, ApiError> {
    let user = UserRepo::new(&state.db)
        .get_by_id(id)
        .await?
        .ok_or(ApiError::NotFound {
            resource: "user",
            id,
        })?;

    Ok(Json(UserResponse::from(user)))
}

/// POST /login - check credentials
///
/// Unknown user and wrong password are indistinguishable to the client.
async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = UserRepo::new(&state.db)
        .get_by_username(&req.username)
        .await?;

    let candidate = req.password;
    let (user, verified) = tokio::task::spawn_blocking(move || match user {
        Some(user) => {
            let verified = user.verify_password(&candidate);
            (Some(user), verified)
        }
        None => (None, verify_dummy_password(&candidate)),
    })
    .await
    .map_err(|e| ApiError::Internal {
        message: format!("password verification task failed: {}", e),
    })?;

    match user {
        Some(user) if verified => Ok(Json(UserResponse::from(user))),
        _ => {
            tracing::info!(username = %req.username, "login rejected");
            Err(ApiError::Unauthorized)
        }
    }
}

/// User routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", post(create_user))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/login", post(login))
}
