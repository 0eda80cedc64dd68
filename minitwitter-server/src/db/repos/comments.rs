//! Comment gateway

use chrono::{DateTime, Utc};
use sqlx::{FromRow, Postgres, QueryBuilder};

use crate::db::{ConnectionProvider, DbError};
use crate::models::CommentContent;

/// Comment record from database
#[derive(Debug, Clone, FromRow)]
pub struct Comment {
    pub id: i64,
    pub author_id: i64,
    pub tweet_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub author_id: i64,
    pub tweet_id: i64,
    pub content: CommentContent,
}

#[derive(Debug, Clone, Default)]
pub struct CommentPatch {
    pub author_id: Option<i64>,
    pub tweet_id: Option<i64>,
    pub content: Option<CommentContent>,
}

impl CommentPatch {
    pub fn is_empty(&self) -> bool {
        self.author_id.is_none() && self.tweet_id.is_none() && self.content.is_none()
    }
}

/// Comment repository
pub struct CommentRepo<'a> {
    provider: &'a ConnectionProvider,
}

impl<'a> CommentRepo<'a> {
    pub fn new(provider: &'a ConnectionProvider) -> Self {
        Self { provider }
    }

    /// Insert a comment. Author and tweet must both exist.
    pub async fn create(&self, new: NewComment) -> Result<Comment, DbError> {
        let mut conn = self.provider.acquire().await?;
        let comment: Comment = sqlx::query_as(
            r#"
            INSERT INTO comments (author_id, tweet_id, content)
            VALUES ($1, $2, $3)
            RETURNING id, author_id, tweet_id, content, created_at
            "#,
        )
        .bind(new.author_id)
        .bind(new.tweet_id)
        .bind(new.content.as_str())
        .fetch_one(&mut *conn)
        .await?;

        tracing::debug!(
            comment_id = comment.id,
            tweet_id = comment.tweet_id,
            "comment created"
        );
        Ok(comment)
    }

    pub async fn update(&self, id: i64, patch: CommentPatch) -> Result<bool, DbError> {
        if patch.is_empty() {
            return Ok(false);
        }

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE comments SET ");
        {
            let mut set = qb.separated(", ");
            if let Some(author_id) = patch.author_id {
                set.push("author_id = ");
                set.push_bind_unseparated(author_id);
            }
            if let Some(tweet_id) = patch.tweet_id {
                set.push("tweet_id = ");
                set.push_bind_unseparated(tweet_id);
            }
            if let Some(content) = patch.content {
                set.push("content = ");
                set.push_bind_unseparated(content.as_str().to_owned());
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
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Comment>, DbError> {
        let mut conn = self.provider.acquire().await?;
        let comment = sqlx::query_as(
            r#"
            SELECT id, author_id, tweet_id, content, created_at
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(comment)
    }
}
