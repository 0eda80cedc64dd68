//! Gateway behaviour against a live PostgreSQL
//!
//! Run with: DATABASE_URL=postgres://... cargo test -p minitwitter-server -- --ignored

use std::sync::atomic::{AtomicU32, Ordering};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use minitwitter_server::db::migrations;
use minitwitter_server::db::repos::*;
use minitwitter_server::models::{CommentContent, Email, Password, TweetContent, Username};
use minitwitter_server::{build_router, AppState, ConnectionProvider, ServerConfig};

static COUNTER: AtomicU32 = AtomicU32::new(0);

async fn provider() -> ConnectionProvider {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let pool = sqlx::PgPool::connect(&url).await.expect("pool creation failed");
    let provider = ConnectionProvider::from_pool(pool);
    migrations::run(&provider).await.expect("migrations failed");
    provider
}

/// Username that does not collide across tests or runs
fn unique_name(prefix: &str) -> String {
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .subsec_nanos();
    format!("{}_{}_{}_{}", prefix, std::process::id(), nanos, n)
}

async fn make_user(db: &ConnectionProvider, password: &str) -> User {
    let name = unique_name("u");
    UserRepo::new(db)
        .create(NewUser {
            username: Username::new(&name).unwrap(),
            email: Email::new(&format!("{}@example.com", name)).unwrap(),
            password: Password::new(password).unwrap(),
            is_admin: false,
        })
        .await
        .expect("user create failed")
}

async fn make_tweet(db: &ConnectionProvider, author: &User, content: &str) -> Tweet {
    TweetRepo::new(db)
        .create(NewTweet {
            content: TweetContent::new(content).unwrap(),
            author_id: author.id,
        })
        .await
        .expect("tweet create failed")
}

#[tokio::test]
#[ignore = "requires database"]
async fn created_ids_are_unique() {
    let db = provider().await;
    let a = make_user(&db, "password-one").await;
    let b = make_user(&db, "password-two").await;

    assert_ne!(a.id, b.id);
}

#[tokio::test]
#[ignore = "requires database"]
async fn password_is_stored_hashed() {
    let db = provider().await;
    let user = make_user(&db, "secret-value").await;

    let stored = UserRepo::new(&db).get_by_id(user.id).await.unwrap().unwrap();
    assert_ne!(stored.password_hash, "secret-value");
    assert!(stored.verify_password("secret-value"));
    assert!(!stored.verify_password("other-value"));
}

#[tokio::test]
#[ignore = "requires database"]
async fn empty_patch_changes_nothing() {
    let db = provider().await;
    let user = make_user(&db, "unchanged-pw").await;
    let repo = UserRepo::new(&db);

    let matched = repo.update(user.id, UserPatch::default()).await.unwrap();
    assert!(!matched);

    let stored = repo.get_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(stored.username, user.username);
    assert_eq!(stored.password_hash, user.password_hash);
}

#[tokio::test]
#[ignore = "requires database"]
async fn password_only_update_rehashes_and_keeps_other_fields() {
    let db = provider().await;
    let user = make_user(&db, "first-password").await;
    let repo = UserRepo::new(&db);

    let patch = UserPatch {
        password: Some(Password::new("second-password").unwrap()),
        ..Default::default()
    };
    assert!(repo.update(user.id, patch).await.unwrap());

    let stored = repo.get_by_id(user.id).await.unwrap().unwrap();
    assert_ne!(stored.password_hash, user.password_hash);
    assert!(stored.verify_password("second-password"));
    assert_eq!(stored.username, user.username);
    assert_eq!(stored.email, user.email);
    assert_eq!(stored.is_admin, user.is_admin);
}

#[tokio::test]
#[ignore = "requires database"]
async fn explicit_false_is_applied() {
    let db = provider().await;
    let user = make_user(&db, "admin-toggle").await;
    let repo = UserRepo::new(&db);

    let promote = UserPatch {
        is_admin: Some(true),
        ..Default::default()
    };
    repo.update(user.id, promote).await.unwrap();
    assert!(repo.get_by_id(user.id).await.unwrap().unwrap().is_admin);

    let demote = UserPatch {
        is_admin: Some(false),
        ..Default::default()
    };
    repo.update(user.id, demote).await.unwrap();
    assert!(!repo.get_by_id(user.id).await.unwrap().unwrap().is_admin);
}

#[tokio::test]
#[ignore = "requires database"]
async fn missing_ids_are_silent() {
    let db = provider().await;
    let missing = i64::MAX;

    assert!(UserRepo::new(&db).get_by_id(missing).await.unwrap().is_none());
    assert!(!UserRepo::new(&db).delete(missing).await.unwrap());
    assert!(!TweetRepo::new(&db).delete(missing).await.unwrap());
    assert!(!CommentRepo::new(&db).delete(missing).await.unwrap());
    assert!(!LikeRepo::new(&db).delete(missing).await.unwrap());

    let patch = TweetPatch {
        content: Some(TweetContent::new("ghost").unwrap()),
        ..Default::default()
    };
    assert!(!TweetRepo::new(&db).update(missing, patch).await.unwrap());
}

#[tokio::test]
#[ignore = "requires database"]
async fn tweet_round_trips_content_and_author() {
    let db = provider().await;
    let author = make_user(&db, "tweet-author").await;
    let tweet = make_tweet(&db, &author, "hello").await;

    let stored = TweetRepo::new(&db).get_by_id(tweet.id).await.unwrap().unwrap();
    assert_eq!(stored.content, "hello");
    assert_eq!(stored.author_id, author.id);
}

#[tokio::test]
#[ignore = "requires database"]
async fn tweet_with_unknown_author_is_rejected() {
    let db = provider().await;
    let err = TweetRepo::new(&db)
        .create(NewTweet {
            content: TweetContent::new("orphan").unwrap(),
            author_id: i64::MAX,
        })
        .await
        .unwrap_err();

    // 23503 = foreign_key_violation
    assert_eq!(err.code().as_deref(), Some("23503"));
}

#[tokio::test]
#[ignore = "requires database"]
async fn deleted_comment_is_absent() {
    let db = provider().await;
    let author = make_user(&db, "commenter-pw").await;
    let tweet = make_tweet(&db, &author, "discuss").await;
    let repo = CommentRepo::new(&db);

    let comment = repo
        .create(NewComment {
            author_id: author.id,
            tweet_id: tweet.id,
            content: CommentContent::new("nice").unwrap(),
        })
        .await
        .unwrap();

    assert!(repo.delete(comment.id).await.unwrap());
    assert!(repo.get_by_id(comment.id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires database"]
async fn concurrent_duplicate_likes_converge() {
    let db = provider().await;
    let liker = make_user(&db, "liker-password").await;
    let tweet = make_tweet(&db, &liker, "like me").await;
    let new = NewLike {
        liker_id: liker.id,
        liked_tweet_id: tweet.id,
    };

    let repo = LikeRepo::new(&db);
    let (a, b) = tokio::join!(repo.create(new), repo.create(new));
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_eq!(a.like.id, b.like.id);
    // Exactly one of the two calls inserted the row
    assert!(a.inserted ^ b.inserted);
}

#[tokio::test]
#[ignore = "requires database"]
async fn deleting_referenced_user_fails() {
    let db = provider().await;
    let author = make_user(&db, "still-referenced").await;
    make_tweet(&db, &author, "keeps author alive").await;

    let err = UserRepo::new(&db).delete(author.id).await.unwrap_err();
    assert_eq!(err.code().as_deref(), Some("23503"));
}

async fn login_status(db: &ConnectionProvider, username: &str, password: &str) -> StatusCode {
    let app = build_router(AppState::new(db.clone()), &ServerConfig::default());
    let body = serde_json::json!({ "username": username, "password": password });
    let request = Request::builder()
        .method("POST")
        .uri("/login")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    app.oneshot(request).await.unwrap().status()
}

#[tokio::test]
#[ignore = "requires database"]
async fn login_accepts_only_matching_credentials() {
    let db = provider().await;
    let user = make_user(&db, "right-password").await;

    assert_eq!(
        login_status(&db, &user.username, "right-password").await,
        StatusCode::OK
    );
    assert_eq!(
        login_status(&db, &user.username, "wrong-password").await,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        login_status(&db, &unique_name("ghost"), "right-password").await,
        StatusCode::UNAUTHORIZED
    );
}
