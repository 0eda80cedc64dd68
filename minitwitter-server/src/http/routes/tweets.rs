//! Tweet endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::repos::{NewTweet, Tweet, TweetPatch, TweetRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, ValidId};
use crate::http::routes::MessageResponse;
use crate::http::server::AppState;
use crate::models::{TweetContent, ValidationError};

/// Create tweet request
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTweetRequest {
    pub content: String,
    pub author_id: i64,
}

/// Update tweet request
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTweetRequest {
    pub content: Option<String>,
    pub author_id: Option<i64>,
}

impl UpdateTweetRequest {
    fn validate(self) -> Result<TweetPatch, ValidationError> {
        Ok(TweetPatch {
            content: self.content.as_deref().map(TweetContent::new).transpose()?,
            author_id: self.author_id,
        })
    }
}

/// Tweet response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TweetResponse {
    pub id: i64,
    pub content: String,
    pub author_id: i64,
    pub created_at: String,
}

impl From<Tweet> for TweetResponse {
    fn from(t: Tweet) -> Self {
        Self {
            id: t.id,
            content: t.content,
            author_id: t.author_id,
            created_at: t.created_at.to_rfc3339(),
        }
    }
}

/// POST /tweets
async fn create_tweet(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateTweetRequest>,
) -> Result<(StatusCode, Json<TweetResponse>), ApiError> {
    let new = NewTweet {
        content: TweetContent::new(&req.content)?,
        author_id: req.author_id,
    };
    let tweet = TweetRepo::new(&state.db).create(new).await?;

    Ok((StatusCode::CREATED, Json(TweetResponse::from(tweet))))
}

/// PUT /tweets/{id}
async fn update_tweet(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    ApiJson(req): ApiJson<UpdateTweetRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let patch = req.validate()?;
    TweetRepo::new(&state.db).update(id, patch).await?;

    Ok(Json(MessageResponse::new("Tweet updated successfully.")))
}

/// DELETE /tweets/{id}
async fn delete_tweet(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<MessageResponse>, ApiError> {
    TweetRepo::new(&state.db).delete(id).await?;

    Ok(Json(MessageResponse::new("Tweet deleted successfully.")))
}

/// GET /tweets/{id}
async fn get_tweet(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<TweetResponse>, ApiError> {
    let tweet = TweetRepo::new(&state.db)
        .get_by_id(id)
        .await?
        .ok_or(ApiError::NotFound {
            resource: "tweet",
            id,
        })?;

    Ok(Json(TweetResponse::from(tweet)))
}

/// Tweet routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tweets", post(create_tweet))
        .route(
            "/tweets/{id}",
            get(get_tweet).put(update_tweet).delete(delete_tweet),
        )
}
