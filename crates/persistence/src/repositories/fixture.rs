//! Fixture repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::FixtureEntity;
use crate::metrics::QueryTimer;

/// Repository for match fixture operations.
#[derive(Clone)]
pub struct FixtureRepository {
    pool: PgPool,
}

impl FixtureRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a fixture by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<FixtureEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_fixture_by_id");
        let result = sqlx::query_as::<_, FixtureEntity>(
            r#"
            SELECT id, competition, home_team, away_team, kickoff_at, venue,
                   status, home_score, away_score, created_at, updated_at
            FROM fixtures
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List fixtures, upcoming first.
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<FixtureEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_fixtures");
        let result = sqlx::query_as::<_, FixtureEntity>(
            r#"
            SELECT id, competition, home_team, away_team, kickoff_at, venue,
                   status, home_score, away_score, created_at, updated_at
            FROM fixtures
            ORDER BY kickoff_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create a fixture.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        competition: &str,
        home_team: &str,
        away_team: &str,
        kickoff_at: DateTime<Utc>,
        venue: Option<&str>,
        status: &str,
    ) -> Result<FixtureEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_fixture");
        let result = sqlx::query_as::<_, FixtureEntity>(
            r#"
            INSERT INTO fixtures (competition, home_team, away_team, kickoff_at, venue, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, competition, home_team, away_team, kickoff_at, venue,
                      status, home_score, away_score, created_at, updated_at
            "#,
        )
        .bind(competition)
        .bind(home_team)
        .bind(away_team)
        .bind(kickoff_at)
        .bind(venue)
        .bind(status)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a fixture, including status and score.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: Uuid,
        competition: &str,
        home_team: &str,
        away_team: &str,
        kickoff_at: DateTime<Utc>,
        venue: Option<&str>,
        status: &str,
        home_score: Option<i16>,
        away_score: Option<i16>,
    ) -> Result<Option<FixtureEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_fixture");
        let result = sqlx::query_as::<_, FixtureEntity>(
            r#"
            UPDATE fixtures
            SET competition = $2, home_team = $3, away_team = $4, kickoff_at = $5,
                venue = $6, status = $7, home_score = $8, away_score = $9,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, competition, home_team, away_team, kickoff_at, venue,
                      status, home_score, away_score, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(competition)
        .bind(home_team)
        .bind(away_team)
        .bind(kickoff_at)
        .bind(venue)
        .bind(status)
        .bind(home_score)
        .bind(away_score)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a fixture. Returns false when no row matched.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_fixture");
        let result = sqlx::query("DELETE FROM fixtures WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    // Note: FixtureRepository tests require database connection and are covered by integration tests
}
