use anyhow::Result;
use sqlx::PgPool;

use crate::database::{
    models::{AuditEntry, NewAuditEntry},
    utils::sql,
};

#[derive(Clone)]
pub struct AuditRepository {
    pool: PgPool,
}

impl AuditRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, entry: NewAuditEntry) -> Result<AuditEntry> {
        let saved = sqlx::query_as::<_, AuditEntry>(&sql(r#"
            INSERT INTO
                audit_log (
                    actor_id,
                    action,
                    entity_type,
                    entity_id,
                    details
                )
            VALUES
                (?, ?, ?, ?, ?)
            RETURNING
                id,
                created_at,
                actor_id,
                action,
                entity_type,
                entity_id,
                details
        "#))
        .bind(entry.actor_id)
        .bind(entry.action)
        .bind(entry.entity_type)
        .bind(entry.entity_id)
        .bind(entry.details)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    pub async fn list_recent(&self, limit: i64) -> Result<Vec<AuditEntry>> {
        let entries = sqlx::query_as::<_, AuditEntry>(&sql(r#"
            SELECT
                id,
                created_at,
                actor_id,
                action,
                entity_type,
                entity_id,
                details
            FROM
                audit_log
            ORDER BY
                created_at DESC
            LIMIT ?
        "#))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
