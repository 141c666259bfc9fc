use anyhow::Result;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::database::{models::RosterDay, utils::sql};

/// `roster_config` holds a single row.
const ROSTER_CONFIG_ID: i32 = 1;

#[derive(Clone)]
pub struct RosterRepository {
    pool: PgPool,
}

impl RosterRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn pattern_for_team(&self, team: &str) -> Result<Vec<RosterDay>> {
        let days = sqlx::query_as::<_, RosterDay>(&sql(r#"
            SELECT
                team,
                day_index,
                roster_type,
                start_time,
                end_time
            FROM
                team_roster_pattern
            WHERE
                team = ?
            ORDER BY
                day_index ASC
        "#))
        .bind(team)
        .fetch_all(&self.pool)
        .await?;

        Ok(days)
    }

    pub async fn base_date(&self) -> Result<Option<NaiveDate>> {
        let base_date = sqlx::query_scalar::<_, NaiveDate>(&sql(
            "SELECT base_date FROM roster_config WHERE id = ?",
        ))
        .bind(ROSTER_CONFIG_ID)
        .fetch_optional(&self.pool)
        .await?;

        Ok(base_date)
    }
}
