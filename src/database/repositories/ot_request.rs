use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::{
    models::{ApprovedEntry, OtRequest, RequestStatus, ShiftCounts},
    utils::sql,
};

const REQUEST_COLUMNS: &str = r#"
    id,
    shift_id,
    user_id,
    status,
    requested_at,
    decided_at,
    decided_by,
    archived,
    notes
"#;

#[derive(Clone)]
pub struct OtRequestRepository {
    pool: PgPool,
}

impl OtRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<OtRequest>> {
        let request = sqlx::query_as::<_, OtRequest>(&sql(&format!(
            "SELECT {REQUEST_COLUMNS} FROM ot_requests WHERE id = ?"
        )))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    pub async fn find_for(&self, shift_id: Uuid, user_id: Uuid) -> Result<Option<OtRequest>> {
        let request = sqlx::query_as::<_, OtRequest>(&sql(&format!(
            "SELECT {REQUEST_COLUMNS} FROM ot_requests WHERE shift_id = ? AND user_id = ?"
        )))
        .bind(shift_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    /// Creates the pair's row or revives a declined/cancelled one. An open
    /// request is left untouched and returned as is.
    pub async fn upsert_requested(
        &self,
        shift_id: Uuid,
        user_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<OtRequest> {
        let written = sqlx::query_as::<_, OtRequest>(&sql(&format!(
            r#"
            INSERT INTO
                ot_requests (
                    shift_id,
                    user_id,
                    status,
                    requested_at,
                    archived
                )
            VALUES
                (?, ?, 'requested', ?, FALSE)
            ON CONFLICT (shift_id, user_id) DO UPDATE
            SET
                status = 'requested',
                requested_at = EXCLUDED.requested_at,
                decided_at = NULL,
                decided_by = NULL,
                archived = FALSE
            WHERE
                ot_requests.status IN ('declined', 'cancelled')
            RETURNING
                {REQUEST_COLUMNS}
            "#
        )))
        .bind(shift_id)
        .bind(user_id)
        .bind(at)
        .fetch_optional(&self.pool)
        .await?;

        match written {
            Some(request) => Ok(request),
            None => self
                .find_for(shift_id, user_id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("Request for shift {shift_id} vanished during upsert")),
        }
    }

    pub async fn cancel(&self, shift_id: Uuid, user_id: Uuid) -> Result<Option<OtRequest>> {
        let request = sqlx::query_as::<_, OtRequest>(&sql(&format!(
            r#"
            UPDATE
                ot_requests
            SET
                status = 'cancelled'
            WHERE
                shift_id = ?
                AND user_id = ?
                AND status IN ('requested', 'approved')
            RETURNING
                {REQUEST_COLUMNS}
            "#
        )))
        .bind(shift_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    /// Records a decision unless the request was cancelled or its shift
    /// was deleted in the meantime.
    pub async fn decide(
        &self,
        id: Uuid,
        status: RequestStatus,
        decided_by: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Option<OtRequest>> {
        let request = sqlx::query_as::<_, OtRequest>(&sql(&format!(
            r#"
            UPDATE
                ot_requests
            SET
                status = ?,
                decided_at = ?,
                decided_by = ?
            WHERE
                id = ?
                AND status <> 'cancelled'
                AND EXISTS (
                    SELECT
                        1
                    FROM
                        shifts s
                    WHERE
                        s.id = ot_requests.shift_id
                        AND s.shift_status = 'active'
                )
            RETURNING
                {REQUEST_COLUMNS}
            "#
        )))
        .bind(status)
        .bind(at)
        .bind(decided_by)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    pub async fn archive(&self, id: Uuid, user_id: Uuid) -> Result<Option<OtRequest>> {
        let request = sqlx::query_as::<_, OtRequest>(&sql(&format!(
            r#"
            UPDATE
                ot_requests
            SET
                archived = TRUE
            WHERE
                id = ?
                AND user_id = ?
            RETURNING
                {REQUEST_COLUMNS}
            "#
        )))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    pub async fn archive_closed(&self, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query(&sql(r#"
            UPDATE
                ot_requests
            SET
                archived = TRUE
            WHERE
                user_id = ?
                AND archived = FALSE
                AND status IN ('declined', 'cancelled')
        "#))
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// The caller's visible history, newest first.
    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<OtRequest>> {
        let requests = sqlx::query_as::<_, OtRequest>(&sql(&format!(
            r#"
            SELECT
                {REQUEST_COLUMNS}
            FROM
                ot_requests
            WHERE
                user_id = ?
                AND archived = FALSE
            ORDER BY
                requested_at DESC
            "#
        )))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    pub async fn list_active(&self) -> Result<Vec<OtRequest>> {
        let requests = sqlx::query_as::<_, OtRequest>(&sql(&format!(
            r#"
            SELECT
                {REQUEST_COLUMNS}
            FROM
                ot_requests
            WHERE
                archived = FALSE
            ORDER BY
                requested_at ASC
            "#
        )))
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    pub async fn shift_counts(&self) -> Result<Vec<ShiftCounts>> {
        let counts = sqlx::query_as::<_, ShiftCounts>(&sql(r#"
            SELECT
                shift_id,
                requested,
                approved,
                declined,
                cancelled
            FROM
                ot_shift_counts
        "#))
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }

    pub async fn approved_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<ApprovedEntry>> {
        let entries = sqlx::query_as::<_, ApprovedEntry>(&sql(r#"
            SELECT
                s.shift_date,
                s.shift_type,
                r.user_id,
                p.full_name
            FROM
                ot_requests r
                INNER JOIN shifts s ON s.id = r.shift_id
                LEFT JOIN profiles p ON p.id = r.user_id
            WHERE
                r.status = 'approved'
                AND s.shift_status = 'active'
                AND s.shift_date BETWEEN ? AND ?
            ORDER BY
                s.shift_date ASC,
                r.requested_at ASC
        "#))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
