//! User gateway
//!
//! Passwords are hashed before they reach SQL; the plaintext is never bound
//! to a statement.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, Postgres, QueryBuilder};

use crate::db::{ConnectionProvider, DbError};
use crate::models::{verify_password, Email, Password, Username};

/// User record from database
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Argon2 PHC string
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Check a candidate password against the stored hash.
    pub fn verify_password(&self, candidate: &str) -> bool {
        verify_password(&self.password_hash, candidate)
    }
}

/// Fields for a new user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: Username,
    pub email: Email,
    pub password: Password,
    pub is_admin: bool,
}

/// Partial update; `None` leaves the column untouched
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub username: Option<Username>,
    pub email: Option<Email>,
    pub password: Option<Password>,
    pub is_admin: Option<bool>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.is_admin.is_none()
    }
}

/// User repository
pub struct UserRepo<'a> {
    provider: &'a ConnectionProvider,
}

impl<'a> UserRepo<'a> {
    pub fn new(provider: &'a ConnectionProvider) -> Self {
        Self { provider }
    }

    /// Insert a user, hashing the password first.
    pub async fn create(&self, new: NewUser) -> Result<User, DbError> {
        // Hash before checking out a connection; hashing is the slow part
        let password_hash = new.password.hash_async().await?;

        let mut conn = self.provider.acquire().await?;
        let user: User = sqlx::query_as(
            r#"
            INSERT INTO users (username, email, password_hash, is_admin)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, password_hash, is_admin, created_at
            "#,
        )
        .bind(new.username.as_str())
        .bind(new.email.as_str())
        .bind(&password_hash)
        .bind(new.is_admin)
        .fetch_one(&mut *conn)
        .await?;

        tracing::debug!(user_id = user.id, "user created");
        Ok(user)
    }

    /// Apply a partial update. Returns whether a row matched.
    ///
    /// The password is rehashed only when the patch carries one.
    pub async fn update(&self, id: i64, patch: UserPatch) -> Result<bool, DbError> {
        if patch.is_empty() {
            return Ok(false);
        }

        let password_hash = match &patch.password {
            Some(password) => Some(password.hash_async().await?),
            None => None,
        };

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE users SET ");
        {
            let mut set = qb.separated(", ");
            if let Some(username) = patch.username {
                set.push("username = ");
                set.push_bind_unseparated(username.as_str().to_owned());
            }
            if let Some(email) = patch.email {
                set.push("email = ");
                set.push_bind_unseparated(email.as_str().to_owned());
            }
            if let Some(hash) = password_hash {
                set.push("password_hash = ");
                set.push_bind_unseparated(hash);
            }
            if let Some(is_admin) = patch.is_admin {
                set.push("is_admin = ");
                set.push_bind_unseparated(is_admin);
            }
        }
        qb.push(" WHERE id = ");
        qb.push_bind(id);

        let mut conn = self.provider.acquire().await?;
        let result = qb.build().execute(&mut *conn).await?;

        let matched = result.rows_affected() > 0;
        tracing::debug!(user_id = id, matched, "user updated");
        Ok(matched)
    }

    /// Delete by id. Returns whether a row was removed.
    pub async fn delete(&self, id: i64) -> Result<bool, DbError> {
        let mut conn = self.provider.acquire().await?;
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>, DbError> {
        let mut conn = self.provider.acquire().await?;
        let user = sqlx::query_as(
            r#"
            SELECT id, username, email, password_hash, is_admin, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(user)
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>, DbError> {
        let mut conn = self.provider.acquire().await?;
        let user = sqlx::query_as(
            r#"
            SELECT id, username, email, password_hash, is_admin, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_patch_is_empty() {
        assert!(UserPatch::default().is_empty());
    }

    #[test]
    fn patch_with_false_flag_is_not_empty() {
        // An explicit `false` is a real update, not an absent field
        let patch = UserPatch {
            is_admin: Some(false),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn verify_against_stored_hash() {
        let password = Password::new("s3cret-password").unwrap();
        let user = User {
            id: 1,
            username: "ada".into(),
            email: "ada@example.com".into(),
            password_hash: password.hash().unwrap(),
            is_admin: false,
            created_at: Utc::now(),
        };

        assert!(user.verify_password("s3cret-password"));
        assert!(!user.verify_password("s3cret-passw0rd"));
    }

    #[tokio::test]
    async fn empty_patch_never_touches_the_store() {
        // Lazy provider pointing nowhere: any acquire would fail
        let config = crate::db::DbConfig::new("127.0.0.1", "x", "x", "x")
            .with_port(9)
            .with_acquire_timeout(std::time::Duration::from_millis(200));
        let provider = ConnectionProvider::connect_lazy(&config);

        let matched = UserRepo::new(&provider)
            .update(42, UserPatch::default())
            .await
            .expect("empty patch should not error");
        assert!(!matched);
    }
}
