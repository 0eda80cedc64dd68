//! Schema migrations for the MiniTwitter tables
//!
//! Every statement is idempotent so `run` is safe on each startup.

use super::{ConnectionProvider, DbError};

const CREATE_TABLES: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        is_admin BOOLEAN NOT NULL DEFAULT FALSE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tweets (
        id BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
        content TEXT NOT NULL,
        author_id BIGINT NOT NULL REFERENCES users(id),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS comments (
        id BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
        author_id BIGINT NOT NULL REFERENCES users(id),
        tweet_id BIGINT NOT NULL REFERENCES tweets(id),
        content TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS likes (
        id BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
        liker_id BIGINT NOT NULL REFERENCES users(id),
        liked_tweet_id BIGINT NOT NULL REFERENCES tweets(id),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        UNIQUE (liker_id, liked_tweet_id)
    )
    "#,
];

const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_tweets_author ON tweets(author_id)",
    "CREATE INDEX IF NOT EXISTS idx_comments_author ON comments(author_id)",
    "CREATE INDEX IF NOT EXISTS idx_comments_tweet ON comments(tweet_id)",
    // likes(liker_id, ...) is covered by the unique constraint
    "CREATE INDEX IF NOT EXISTS idx_likes_tweet ON likes(liked_tweet_id)",
];

/// Run all migrations
pub async fn run(provider: &ConnectionProvider) -> Result<(), DbError> {
    tracing::info!("Running migrations...");

    let mut conn = provider.acquire().await?;
    for statement in CREATE_TABLES.iter().chain(CREATE_INDEXES) {
        sqlx::query(*statement).execute(&mut *conn).await?;
    }

    tracing::info!("Migrations complete");
    Ok(())
}
