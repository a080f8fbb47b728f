//! User Repository

use super::{BaseRepository, CountRow, RepoError, RepoResult, parse_record};
use crate::db::models::{User, UserUpdate};
use chrono::{DateTime, Utc};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub fn record(id: &str) -> RepoResult<RecordId> {
        parse_record(TABLE, id)
    }

    pub async fn create(&self, user: User) -> RepoResult<User> {
        if self.find_by_email(&user.email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Email {} is already registered",
                user.email
            )));
        }
        if self.find_by_username(&user.username).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Username {} is already taken",
                user.username
            )));
        }
        let created: Option<User> = self.base.db().create(TABLE).content(user).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let thing = Self::record(id)?;
        let user: Option<User> = self.base.db().select(thing).await?;
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email.to_string()))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    pub async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE username = $username LIMIT 1")
            .bind(("username", username.to_string()))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    pub async fn find_all(&self) -> RepoResult<Vec<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(users)
    }

    pub async fn update(&self, id: &str, patch: UserUpdate) -> RepoResult<Option<User>> {
        let thing = Self::record(id)?;
        if let Some(email) = &patch.email
            && let Some(existing) = self.find_by_email(email).await?
            && existing.id.as_ref() != Some(&thing)
        {
            return Err(RepoError::Duplicate(format!(
                "Email {email} is already registered"
            )));
        }
        if let Some(username) = &patch.username
            && let Some(existing) = self.find_by_username(username).await?
            && existing.id.as_ref() != Some(&thing)
        {
            return Err(RepoError::Duplicate(format!(
                "Username {username} is already taken"
            )));
        }
        let mut merge = serde_json::Map::new();
        if let Some(v) = patch.username {
            merge.insert("username".into(), serde_json::json!(v));
        }
        if let Some(v) = patch.email {
            merge.insert("email".into(), serde_json::json!(v));
        }
        if let Some(v) = patch.role {
            merge.insert("role".into(), serde_json::json!(v));
        }
        let updated: Option<User> = self
            .base
            .db()
            .update(thing)
            .merge(serde_json::Value::Object(merge))
            .await?;
        Ok(updated)
    }

    pub async fn set_password(&self, id: &RecordId, password_hash: String) -> RepoResult<()> {
        let _: Option<User> = self
            .base
            .db()
            .update(id.clone())
            .merge(serde_json::json!({ "password": password_hash }))
            .await?;
        Ok(())
    }

    /// Store the hashed reset token and its expiry on the user
    pub async fn set_reset_token(
        &self,
        id: &RecordId,
        token_hash: String,
        expire: DateTime<Utc>,
    ) -> RepoResult<()> {
        let _: Option<User> = self
            .base
            .db()
            .update(id.clone())
            .merge(serde_json::json!({
                "reset_password_token": token_hash,
                "reset_password_expire": expire,
            }))
            .await?;
        Ok(())
    }

    /// Find a user holding this (hashed) reset token that has not expired
    pub async fn find_by_reset_token(&self, token_hash: &str) -> RepoResult<Option<User>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM user WHERE reset_password_token = $token \
                 AND reset_password_expire > $now LIMIT 1",
            )
            .bind(("token", token_hash.to_string()))
            .bind(("now", Utc::now()))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    pub async fn clear_reset_token(&self, id: &RecordId) -> RepoResult<()> {
        let _: Option<User> = self
            .base
            .db()
            .update(id.clone())
            .merge(serde_json::json!({
                "reset_password_token": serde_json::Value::Null,
                "reset_password_expire": serde_json::Value::Null,
            }))
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> RepoResult<Option<User>> {
        let thing = Self::record(id)?;
        let deleted: Option<User> = self.base.db().delete(thing).await?;
        Ok(deleted)
    }

    pub async fn count(&self) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM user GROUP ALL")
            .await?;
        let rows: Vec<CountRow> = result.take(0)?;
        Ok(rows.first().map(|r| r.count).unwrap_or(0))
    }

    /// Case-insensitive substring match on username and email
    pub async fn search(&self, term: &str) -> RepoResult<Vec<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query(
                "SELECT * FROM user WHERE \
                 string::contains(string::lowercase(username), $q) \
                 OR string::contains(string::lowercase(email), $q)",
            )
            .bind(("q", term.to_lowercase()))
            .await?
            .take(0)?;
        Ok(users)
    }
}
