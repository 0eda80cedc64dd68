//! Like endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::repos::{Like, LikePatch, LikeRepo, NewLike};
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, ValidId};
use crate::http::routes::MessageResponse;
use crate::http::server::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLikeRequest {
    pub liker_id: i64,
    pub liked_tweet_id: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLikeRequest {
    pub liker_id: Option<i64>,
    pub liked_tweet_id: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub id: i64,
    pub liker_id: i64,
    pub liked_tweet_id: i64,
    pub created_at: String,
}

impl From<Like> for LikeResponse {
    fn from(l: Like) -> Self {
        Self {
            id: l.id,
            liker_id: l.liker_id,
            liked_tweet_id: l.liked_tweet_id,
            created_at: l.created_at.to_rfc3339(),
        }
    }
}

/// POST /likes - 201 for a new like, 200 when the pair already existed
async fn create_like(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateLikeRequest>,
) -> Result<(StatusCode, Json<LikeResponse>), ApiError> {
    let new = NewLike {
        liker_id: req.liker_id,
        liked_tweet_id: req.liked_tweet_id,
    };
    let outcome = LikeRepo::new(&state.db).create(new).await?;

    let status = if outcome.inserted {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(LikeResponse::from(outcome.like))))
}

/// PUT /likes/{id}
async fn update_like(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    ApiJson(req): ApiJson<UpdateLikeRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let patch = LikePatch {
        liker_id: req.liker_id,
        liked_tweet_id: req.liked_tweet_id,
    };
    LikeRepo::new(&state.db).update(id, patch).await?;

    Ok(Json(MessageResponse::new("Like updated successfully.")))
}

/// DELETE /likes/{id}
async fn delete_like(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<MessageResponse>, ApiError> {
    LikeRepo::new(&state.db).delete(id).await?;

    Ok(Json(MessageResponse::new("Like deleted successfully.")))
}

/// GET /likes/{id}
async fn get_like(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<LikeResponse>, ApiError> {
    let like = LikeRepo::new(&state.db)
        .get_by_id(id)
        .await?
        .ok_or(ApiError::NotFound {
            resource: "like",
            id,
        })?;

    Ok(Json(LikeResponse::from(like)))
}

/// Like routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/likes", post(create_like))
        .route(
            "/likes/{id}",
            get(get_like).put(update_like).delete(delete_like),
        )
}
