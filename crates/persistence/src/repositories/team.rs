//! Team repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::TeamEntity;
use crate::metrics::QueryTimer;

/// Repository for club team operations.
#[derive(Clone)]
pub struct TeamRepository {
    pool: PgPool,
}

impl TeamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a team by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<TeamEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_team_by_id");
        let result = sqlx::query_as::<_, TeamEntity>(
            r#"
            SELECT id, name, division, coach, photo_url, created_at, updated_at
            FROM teams
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// All teams, alphabetical.
    pub async fn list(&self) -> Result<Vec<TeamEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_teams");
        let result = sqlx::query_as::<_, TeamEntity>(
            r#"
            SELECT id, name, division, coach, photo_url, created_at, updated_at
            FROM teams
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create a team.
    pub async fn create(
        &self,
        name: &str,
        division: Option<&str>,
        coach: Option<&str>,
        photo_url: Option<&str>,
    ) -> Result<TeamEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_team");
        let result = sqlx::query_as::<_, TeamEntity>(
            r#"
            INSERT INTO teams (name, division, coach, photo_url)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, division, coach, photo_url, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(division)
        .bind(coach)
        .bind(photo_url)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a team.
    pub async fn update(
        &self,
        id: Uuid,
        name: &str,
        division: Option<&str>,
        coach: Option<&str>,
        photo_url: Option<&str>,
    ) -> Result<Option<TeamEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_team");
        let result = sqlx::query_as::<_, TeamEntity>(
            r#"
            UPDATE teams
            SET name = $2, division = $3, coach = $4, photo_url = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, division, coach, photo_url, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(division)
        .bind(coach)
        .bind(photo_url)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a team. Returns false when no row matched.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_team");
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    // Note: TeamRepository tests require database connection and are covered by integration tests
}
