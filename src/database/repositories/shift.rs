use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::{
    models::{Shift, ShiftInput},
    utils::sql,
};

const SHIFT_COLUMNS: &str = r#"
    id,
    shift_date,
    shift_type,
    start_time,
    end_time,
    department,
    spots_available,
    shift_status,
    notes,
    deleted_at,
    created_at
"#;

#[derive(Clone)]
pub struct ShiftRepository {
    pool: PgPool,
}

impl ShiftRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Shift>> {
        let shift = sqlx::query_as::<_, Shift>(&sql(&format!(
            "SELECT {SHIFT_COLUMNS} FROM shifts WHERE id = ?"
        )))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(shift)
    }

    /// Shifts dated `from` onwards, ordered by date then day before night.
    pub async fn list_from(&self, from: NaiveDate, include_deleted: bool) -> Result<Vec<Shift>> {
        let shifts = sqlx::query_as::<_, Shift>(&sql(&format!(
            r#"
            SELECT
                {SHIFT_COLUMNS}
            FROM
                shifts
            WHERE
                shift_date >= ?
                AND (? OR shift_status = 'active')
            ORDER BY
                shift_date ASC,
                shift_type ASC
            "#
        )))
        .bind(from)
        .bind(include_deleted)
        .fetch_all(&self.pool)
        .await?;

        Ok(shifts)
    }

    /// Publishing the same date and type again replaces the earlier shift
    /// and reactivates it if it had been deleted.
    pub async fn upsert_many(&self, inputs: &[ShiftInput]) -> Result<Vec<Shift>> {
        let mut tx = self.pool.begin().await?;
        let mut shifts = Vec::with_capacity(inputs.len());

        for input in inputs {
            let shift = sqlx::query_as::<_, Shift>(&sql(&format!(
                r#"
                INSERT INTO
                    shifts (
                        shift_date,
                        shift_type,
                        start_time,
                        end_time,
                        department,
                        spots_available,
                        shift_status,
                        notes
                    )
                VALUES
                    (?, ?, ?, ?, ?, ?, 'active', ?)
                ON CONFLICT (shift_date, shift_type) DO UPDATE
                SET
                    start_time = EXCLUDED.start_time,
                    end_time = EXCLUDED.end_time,
                    department = EXCLUDED.department,
                    spots_available = EXCLUDED.spots_available,
                    shift_status = 'active',
                    deleted_at = NULL,
                    notes = EXCLUDED.notes
                RETURNING
                    {SHIFT_COLUMNS}
                "#
            )))
            .bind(input.shift_date)
            .bind(input.shift_type)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(&input.department)
            .bind(input.spots_available)
            .bind(&input.notes)
            .fetch_one(&mut *tx)
            .await?;

            shifts.push(shift);
        }

        tx.commit().await?;
        Ok(shifts)
    }

    pub async fn update_capacity(&self, id: Uuid, spots_available: i32) -> Result<Option<Shift>> {
        let shift = sqlx::query_as::<_, Shift>(&sql(&format!(
            r#"
            UPDATE
                shifts
            SET
                spots_available = ?
            WHERE
                id = ?
            RETURNING
                {SHIFT_COLUMNS}
            "#
        )))
        .bind(spots_available)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(shift)
    }

    /// Marks the shift deleted and declines every open request on it in one
    /// transaction. Returns the shift and the number of declined requests.
    pub async fn soft_delete_and_decline(
        &self,
        id: Uuid,
        deleted_by: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Option<(Shift, u64)>> {
        let mut tx = self.pool.begin().await?;

        let shift = sqlx::query_as::<_, Shift>(&sql(&format!(
            r#"
            UPDATE
                shifts
            SET
                shift_status = 'deleted',
                deleted_at = ?
            WHERE
                id = ?
                AND shift_status = 'active'
            RETURNING
                {SHIFT_COLUMNS}
            "#
        )))
        .bind(at)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(shift) = shift else {
            tx.rollback().await?;
            return Ok(None);
        };

        let declined = sqlx::query(&sql(r#"
            UPDATE
                ot_requests
            SET
                status = 'declined',
                decided_at = ?,
                decided_by = ?
            WHERE
                shift_id = ?
                AND status IN ('requested', 'approved')
        "#))
        .bind(at)
        .bind(deleted_by)
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;
        Ok(Some((shift, declined)))
    }
}
