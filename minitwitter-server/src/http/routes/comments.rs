//! Comment endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::repos::{Comment, CommentPatch, CommentRepo, NewComment};
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, ValidId};
use crate::http::routes::MessageResponse;
use crate::http::server::AppState;
use crate::models::{CommentContent, ValidationError};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub author_id: i64,
    pub tweet_id: i64,
    pub content: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCommentRequest {
    pub author_id: Option<i64>,
    pub tweet_id: Option<i64>,
    pub content: Option<String>,
}

impl UpdateCommentRequest {
    fn validate(self) -> Result<CommentPatch, ValidationError> {
        Ok(CommentPatch {
            author_id: self.author_id,
            tweet_id: self.tweet_id,
            content: self.content.as_deref().map(CommentContent::new).transpose()?,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: i64,
    pub author_id: i64,
    pub tweet_id: i64,
    pub content: String,
    pub created_at: String,
}

impl From<Comment> for CommentResponse {
    fn from(c: Comment) -> Self {
        Self {
            id: c.id,
            author_id: c.author_id,
            tweet_id: c.tweet_id,
            content: c.content,
            created_at: c.created_at.to_rfc3339(),
        }
    }
}

/// POST /comments
async fn create_comment(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), ApiError> {
    let new = NewComment {
        author_id: req.author_id,
        tweet_id: req.tweet_id,
        content: CommentContent::new(&req.content)?,
    };
    let comment = CommentRepo::new(&state.db).create(new).await?;

    Ok((StatusCode::CREATED, Json(CommentResponse::from(comment))))
}

/// PUT /comments/{id}
async fn update_comment(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    ApiJson(req): ApiJson<UpdateCommentRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let patch = req.validate()?;
    CommentRepo::new(&state.db).update(id, patch).await?;

    Ok(Json(MessageResponse::new("Comment updated successfully.")))
}

/// DELETE /comments/{id}
async fn delete_comment(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<MessageResponse>, ApiError> {
    CommentRepo::new(&state.db).delete(id).await?;

    Ok(Json(MessageResponse::new("Comment deleted successfully.")))
}

/// GET /comments/{id}
async fn get_comment(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<CommentResponse>, ApiError> {
    let comment = CommentRepo::new(&state.db)
        .get_by_id(id)
        .await?
        .ok_or(ApiError::NotFound {
            resource: "comment",
            id,
        })?;

    Ok(Json(CommentResponse::from(comment)))
}

/// Comment routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/comments", post(create_comment))
        .route(
            "/comments/{id}",
            get(get_comment).put(update_comment).delete(delete_comment),
        )
}
