//! Tweet gateway

use chrono::{DateTime, Utc};
use sqlx::{FromRow, Postgres, QueryBuilder};

use crate::db::{ConnectionProvider, DbError};
use crate::models::TweetContent;

/// Tweet record from database
#[derive(Debug, Clone, FromRow)]
pub struct Tweet {
    pub id: i64,
    pub content: String,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTweet {
    pub content: TweetContent,
    pub author_id: i64,
}

#[derive(Debug, Clone, Default)]
pub struct TweetPatch {
    pub content: Option<TweetContent>,
    pub author_id: Option<i64>,
}

impl TweetPatch {
    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.author_id.is_none()
    }
}

/// Tweet repository
pub struct TweetRepo<'a> {
    provider: &'a ConnectionProvider,
}

impl<'a> TweetRepo<'a> {
    pub fn new(provider: &'a ConnectionProvider) -> Self {
        Self { provider }
    }

    /// Insert a tweet. A nonexistent author fails the foreign key.
    pub async fn create(&self, new: NewTweet) -> Result<Tweet, DbError> {
        let mut conn = self.provider.acquire().await?;
        let tweet: Tweet = sqlx::query_as(
            r#"
            INSERT INTO tweets (content, author_id)
            VALUES ($1, $2)
            RETURNING id, content, author_id, created_at
            "#,
        )
        .bind(new.content.as_str())
        .bind(new.author_id)
        .fetch_one(&mut *conn)
        .await?;

        tracing::debug!(tweet_id = tweet.id, author_id = tweet.author_id, "tweet created");
        Ok(tweet)
    }

    pub async fn update(&self, id: i64, patch: TweetPatch) -> Result<bool, DbError> {
        if patch.is_empty() {
            return Ok(false);
        }

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE tweets SET ");
        {
            let mut set = qb.separated(", ");
            if let Some(content) = patch.content {
                set.push("content = ");
                set.push_bind_unseparated(content.as_str().to_owned());
            }
            if let Some(author_id) = patch.author_id {
                set.push("author_id = ");
                set.push_bind_unseparated(author_id);
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
        let result = sqlx::query("DELETE FROM tweets WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Tweet>, DbError> {
        let mut conn = self.provider.acquire().await?;
        let tweet = sqlx::query_as(
            r#"
            SELECT id, content, author_id, created_at
            FROM tweets
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(tweet)
    }
}
