//! Like gateway
//!
//! A user likes a tweet at most once: `create` is idempotent on the
//! (liker, tweet) pair via ON CONFLICT, so concurrent duplicates converge
//! on one row without a check-then-insert race.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, Postgres, QueryBuilder, Row};

use crate::db::{ConnectionProvider, DbError};

/// Like record from database
#[derive(Debug, Clone, FromRow)]
pub struct Like {
    pub id: i64,
    pub liker_id: i64,
    pub liked_tweet_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy)]
pub struct NewLike {
    pub liker_id: i64,
    pub liked_tweet_id: i64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LikePatch {
    pub liker_id: Option<i64>,
    pub liked_tweet_id: Option<i64>,
}

impl LikePatch {
    pub fn is_empty(&self) -> bool {
        self.liker_id.is_none() && self.liked_tweet_id.is_none()
    }
}

/// Result of [`LikeRepo::create`]
#[derive(Debug, Clone)]
pub struct LikeOutcome {
    pub like: Like,
    /// `false` when the pair already existed and the stored like was returned
    pub inserted: bool,
}

/// Like repository
pub struct LikeRepo<'a> {
    provider: &'a ConnectionProvider,
}

impl<'a> LikeRepo<'a> {
    pub fn new(provider: &'a ConnectionProvider) -> Self {
        Self { provider }
    }

    /// Create a like, returning the existing one on conflict.
    pub async fn create(&self, new: NewLike) -> Result<LikeOutcome, DbError> {
        let mut conn = self.provider.acquire().await?;

        // The no-op DO UPDATE makes RETURNING yield the existing row;
        // xmax = 0 only for a freshly inserted tuple.
        let row = sqlx::query(
            r#"
            INSERT INTO likes (liker_id, liked_tweet_id)
            VALUES ($1, $2)
            ON CONFLICT (liker_id, liked_tweet_id)
                DO UPDATE SET liker_id = EXCLUDED.liker_id
            RETURNING id, liker_id, liked_tweet_id, created_at, (xmax = 0) AS inserted
            "#,
        )
        .bind(new.liker_id)
        .bind(new.liked_tweet_id)
        .fetch_one(&mut *conn)
        .await?;

        let outcome = LikeOutcome {
            like: Like {
                id: row.try_get("id")?,
                liker_id: row.try_get("liker_id")?,
                liked_tweet_id: row.try_get("liked_tweet_id")?,
                created_at: row.try_get("created_at")?,
            },
            inserted: row.try_get("inserted")?,
        };

        tracing::debug!(
            like_id = outcome.like.id,
            inserted = outcome.inserted,
            "like stored"
        );
        Ok(outcome)
    }

    /// Re-point a like. Moving it onto an existing pair violates uniqueness.
    pub async fn update(&self, id: i64, patch: LikePatch) -> Result<bool, DbError> {
        if patch.is_empty() {
            return Ok(false);
        }

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE likes SET ");
        {
            let mut set = qb.separated(", ");
            if let Some(liker_id) = patch.liker_id {
                set.push("liker_id = ");
                set.push_bind_unseparated(liker_id);
            }
            if let Some(liked_tweet_id) = patch.liked_tweet_id {
                set.push("liked_tweet_id = ");
                set.push_bind_unseparated(liked_tweet_id);
            }
        }
        qb.push(" WHERE id = ");
        qb.push_bind(id);

        let mut conn = self.provider.acquire().await?;
        let result = qb.build().execute(&mut *conn).await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, id: i64) -> Result<bool, DbError> {
        let mut conn = self.provider.acquire().await?;
        let result = sqlx::query("DELETE FROM likes WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Like>, DbError> {
        let mut conn = self.provider.acquire().await?;
        let like = sqlx::query_as(
            r#"
            SELECT id, liker_id, liked_tweet_id, created_at
            FROM likes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(like)
    }
}
