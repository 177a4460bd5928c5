//! Player repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::PlayerEntity;
use crate::metrics::QueryTimer;

/// Repository for squad player operations.
#[derive(Clone)]
pub struct PlayerRepository {
    pool: PgPool,
}

impl PlayerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a player by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<PlayerEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_player_by_id");
        let result = sqlx::query_as::<_, PlayerEntity>(
            r#"
            SELECT id, name, jersey_number, position, team_id, photo_url, bio,
                   active, created_at, updated_at
            FROM players
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List players, optionally restricted to a team, jersey order.
    pub async fn list(&self, team_id: Option<Uuid>) -> Result<Vec<PlayerEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_players");
        let result = sqlx::query_as::<_, PlayerEntity>(
            r#"
            SELECT id, name, jersey_number, position, team_id, photo_url, bio,
                   active, created_at, updated_at
            FROM players
            WHERE ($1::uuid IS NULL OR team_id = $1)
            ORDER BY jersey_number ASC
            "#,
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create a player.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        name: &str,
        jersey_number: i16,
        position: &str,
        team_id: Option<Uuid>,
        photo_url: Option<&str>,
        bio: Option<&str>,
    ) -> Result<PlayerEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_player");
        let result = sqlx::query_as::<_, PlayerEntity>(
            r#"
            INSERT INTO players (name, jersey_number, position, team_id, photo_url, bio, active)
            VALUES ($1, $2, $3, $4, $5, $6, TRUE)
            RETURNING id, name, jersey_number, position, team_id, photo_url, bio,
                      active, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(jersey_number)
        .bind(position)
        .bind(team_id)
        .bind(photo_url)
        .bind(bio)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a player.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: Uuid,
        name: &str,
        jersey_number: i16,
        position: &str,
        team_id: Option<Uuid>,
        photo_url: Option<&str>,
        bio: Option<&str>,
        active: bool,
    ) -> Result<Option<PlayerEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_player");
        let result = sqlx::query_as::<_, PlayerEntity>(
            r#"
            UPDATE players
            SET name = $2, jersey_number = $3, position = $4, team_id = $5,
                photo_url = $6, bio = $7, active = $8, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, jersey_number, position, team_id, photo_url, bio,
                      active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(jersey_number)
        .bind(position)
        .bind(team_id)
        .bind(photo_url)
        .bind(bio)
        .bind(active)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a player. Returns false when no row matched.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_player");
        let result = sqlx::query("DELETE FROM players WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    // Note: PlayerRepository tests require database connection and are covered by integration tests
}
