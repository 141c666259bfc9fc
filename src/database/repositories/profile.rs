use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::{
    models::{Profile, Role, Staffing},
    utils::sql,
};

#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(&sql(r#"
            SELECT
                id,
                full_name,
                phone,
                role,
                created_at
            FROM
                profiles
            WHERE
                id = ?
        "#))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    pub async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Profile>> {
        let profiles = sqlx::query_as::<_, Profile>(&sql(r#"
            SELECT
                id,
                full_name,
                phone,
                role,
                created_at
            FROM
                profiles
            WHERE
                id = ANY(?)
        "#))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(profiles)
    }

    /// All profiles, optionally of one role, ordered by name.
    pub async fn list_all(&self, role: Option<Role>) -> Result<Vec<Profile>> {
        let profiles = sqlx::query_as::<_, Profile>(&sql(r#"
            SELECT
                id,
                full_name,
                phone,
                role,
                created_at
            FROM
                profiles
            WHERE
                (?::TEXT IS NULL OR role = ?)
            ORDER BY
                full_name ASC NULLS LAST,
                created_at DESC
        "#))
        .bind(role)
        .bind(role)
        .fetch_all(&self.pool)
        .await?;

        Ok(profiles)
    }

    pub async fn update_details(
        &self,
        id: Uuid,
        full_name: &str,
        phone: Option<&str>,
    ) -> Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(&sql(r#"
            UPDATE
                profiles
            SET
                full_name = ?,
                phone = ?
            WHERE
                id = ?
            RETURNING
                id,
                full_name,
                phone,
                role,
                created_at
        "#))
        .bind(full_name)
        .bind(phone)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    pub async fn set_role(&self, id: Uuid, role: Role) -> Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(&sql(r#"
            UPDATE
                profiles
            SET
                role = ?
            WHERE
                id = ?
            RETURNING
                id,
                full_name,
                phone,
                role,
                created_at
        "#))
        .bind(role)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    pub async fn find_staffing(&self, user_id: Uuid) -> Result<Option<Staffing>> {
        let staffing = sqlx::query_as::<_, Staffing>(&sql(
            "SELECT user_id, team, band FROM user_staffing WHERE user_id = ?",
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(staffing)
    }

    pub async fn upsert_staffing(&self, staffing: &Staffing) -> Result<Staffing> {
        let saved = sqlx::query_as::<_, Staffing>(&sql(r#"
            INSERT INTO
                user_staffing (user_id, team, band)
            VALUES
                (?, ?, ?)
            ON CONFLICT (user_id) DO UPDATE
            SET
                team = EXCLUDED.team,
                band = EXCLUDED.band
            RETURNING
                user_id,
                team,
                band
        "#))
        .bind(staffing.user_id)
        .bind(&staffing.team)
        .bind(&staffing.band)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }
}
