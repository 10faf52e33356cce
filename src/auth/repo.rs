use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::repo_types::{NewUser, Projection, User, VerificationToken};

#[derive(Debug, Error)]
pub enum CreateUserError {
    #[error("email already registered")]
    EmailTaken,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with [`CreateUserError::EmailTaken`] if the email is already in use.
    async fn create(&self, new_user: NewUser<'_>) -> Result<User, CreateUserError>;
    async fn find_by_email(
        &self,
        email: &str,
        projection: Projection,
    ) -> anyhow::Result<Option<User>>;
    async fn find_by_id(&self, id: Uuid, projection: Projection) -> anyhow::Result<Option<User>>;
    /// Persists the mutable fields. A `None` password hash leaves the stored one untouched.
    async fn save(&self, user: &User) -> anyhow::Result<User>;
}

#[async_trait]
pub trait VerificationTokenStore: Send + Sync {
    async fn insert(&self, user_id: Uuid, secret: &str) -> anyhow::Result<VerificationToken>;
    async fn find(&self, user_id: Uuid, secret: &str) -> anyhow::Result<Option<VerificationToken>>;
    /// Returns whether a token was removed.
    async fn delete(&self, user_id: Uuid, secret: &str) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, new_user: NewUser<'_>) -> Result<User, CreateUserError> {
        let sql = format!(
            r#"
            INSERT INTO users (first_name, last_name, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            Projection::WithEmail.columns()
        );
        let result = sqlx::query_as::<_, User>(&sql)
            .bind(new_user.first_name)
            .bind(new_user.last_name)
            .bind(new_user.email)
            .bind(new_user.password_hash)
            .fetch_one(&self.db)
            .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(CreateUserError::EmailTaken)
            }
            Err(e) => Err(anyhow::Error::new(e).context("insert user").into()),
        }
    }

    async fn find_by_email(
        &self,
        email: &str,
        projection: Projection,
    ) -> anyhow::Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", projection.columns());
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.db)
            .await
            .context("find user by email")?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid, projection: Projection) -> anyhow::Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", projection.columns());
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .context("find user by id")?;
        Ok(user)
    }

    async fn save(&self, user: &User) -> anyhow::Result<User> {
        let sql = format!(
            r#"
            UPDATE users
               SET first_name = $2,
                   last_name = $3,
                   photo = $4,
                   verified = $5,
                   password_hash = COALESCE($6, password_hash),
                   updated_at = now()
             WHERE id = $1
            RETURNING {}
            "#,
            Projection::Default.columns()
        );
        let saved = sqlx::query_as::<_, User>(&sql)
            .bind(user.id)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.photo)
            .bind(user.verified)
            .bind(&user.password_hash)
            .fetch_one(&self.db)
            .await
            .with_context(|| format!("save user {}", user.id))?;
        Ok(saved)
    }
}

#[derive(Clone)]
pub struct PgVerificationTokenStore {
    db: PgPool,
}

impl PgVerificationTokenStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl VerificationTokenStore for PgVerificationTokenStore {
    async fn insert(&self, user_id: Uuid, secret: &str) -> anyhow::Result<VerificationToken> {
        let token = sqlx::query_as::<_, VerificationToken>(
            r#"
            INSERT INTO verification_tokens (user_id, secret)
            VALUES ($1, $2)
            RETURNING user_id, secret, created_at
            "#,
        )
        .bind(user_id)
        .bind(secret)
        .fetch_one(&self.db)
        .await
        .context("insert verification token")?;
        Ok(token)
    }

    async fn find(&self, user_id: Uuid, secret: &str) -> anyhow::Result<Option<VerificationToken>> {
        let token = sqlx::query_as::<_, VerificationToken>(
            r#"
            SELECT user_id, secret, created_at
              FROM verification_tokens
             WHERE user_id = $1 AND secret = $2
            "#,
        )
        .bind(user_id)
        .bind(secret)
        .fetch_optional(&self.db)
        .await
        .context("find verification token")?;
        Ok(token)
    }

    async fn delete(&self, user_id: Uuid, secret: &str) -> anyhow::Result<bool> {
        let result = sqlx::query(
            "DELETE FROM verification_tokens WHERE user_id = $1 AND secret = $2",
        )
        .bind(user_id)
        .bind(secret)
        .execute(&self.db)
        .await
        .context("delete verification token")?;
        Ok(result.rows_affected() > 0)
    }
}
