use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::policy::Owned;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Actinobacteria {
    pub id: Uuid,
    pub user_id: Uuid,
    pub scientific_name: String,
    pub designation: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Owned for Actinobacteria {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

/// Validated domain fields; the owner is never part of this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActinobacteriaFields {
    pub scientific_name: String,
    pub designation: String,
}

#[async_trait]
pub trait ActinobacteriaStore: Send + Sync {
    async fn list_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Actinobacteria>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Actinobacteria>>;
    async fn create(
        &self,
        user_id: Uuid,
        fields: &ActinobacteriaFields,
    ) -> anyhow::Result<Actinobacteria>;
    /// `None` if the record vanished between the ownership check and the write.
    async fn update(
        &self,
        id: Uuid,
        fields: &ActinobacteriaFields,
    ) -> anyhow::Result<Option<Actinobacteria>>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgActinobacteriaStore {
    db: PgPool,
}

impl PgActinobacteriaStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ActinobacteriaStore for PgActinobacteriaStore {
    async fn list_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Actinobacteria>> {
        let rows = sqlx::query_as::<_, Actinobacteria>(
            r#"
            SELECT id, user_id, scientific_name, designation, created_at, updated_at
              FROM actinobacterias
             WHERE user_id = $1
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await
        .context("list actinobacterias")?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Actinobacteria>> {
        let row = sqlx::query_as::<_, Actinobacteria>(
            r#"
            SELECT id, user_id, scientific_name, designation, created_at, updated_at
              FROM actinobacterias
             WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find actinobacteria")?;
        Ok(row)
    }

    async fn create(
        &self,
        user_id: Uuid,
        fields: &ActinobacteriaFields,
    ) -> anyhow::Result<Actinobacteria> {
        let row = sqlx::query_as::<_, Actinobacteria>(
            r#"
            INSERT INTO actinobacterias (user_id, scientific_name, designation)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, scientific_name, designation, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(&fields.scientific_name)
        .bind(&fields.designation)
        .fetch_one(&self.db)
        .await
        .context("insert actinobacteria")?;
        Ok(row)
    }

    async fn update(
        &self,
        id: Uuid,
        fields: &ActinobacteriaFields,
    ) -> anyhow::Result<Option<Actinobacteria>> {
        let row = sqlx::query_as::<_, Actinobacteria>(
            r#"
            UPDATE actinobacterias
               SET scientific_name = $2,
                   designation = $3,
                   updated_at = now()
             WHERE id = $1
            RETURNING id, user_id, scientific_name, designation, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&fields.scientific_name)
        .bind(&fields.designation)
        .fetch_optional(&self.db)
        .await
        .context("update actinobacteria")?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM actinobacterias WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete actinobacteria")?;
        Ok(result.rows_affected() > 0)
    }
}
