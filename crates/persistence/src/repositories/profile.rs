//! User profile repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::ProfileEntity;
use crate::metrics::QueryTimer;

/// Repository for user profile operations.
#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a profile by user ID.
    pub async fn find_by_user_id(
        &self,
        user_id: Uuid,
    ) -> Result<Option<ProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_profile_by_user_id");
        let result = sqlx::query_as::<_, ProfileEntity>(
            r#"
            SELECT user_id, email, display_name, avatar_url, phone, address,
                   role, status, created_by, created_at, updated_at
            FROM profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a profile by email address.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<ProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_profile_by_email");
        let result = sqlx::query_as::<_, ProfileEntity>(
            r#"
            SELECT user_id, email, display_name, avatar_url, phone, address,
                   role, status, created_by, created_at, updated_at
            FROM profiles
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create a profile for a freshly registered user.
    pub async fn create_profile(
        &self,
        user_id: Uuid,
        email: &str,
        display_name: Option<&str>,
        role: &str,
        created_by: Option<Uuid>,
    ) -> Result<ProfileEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_profile");
        let result = sqlx::query_as::<_, ProfileEntity>(
            r#"
            INSERT INTO profiles (user_id, email, display_name, role, status, created_by)
            VALUES ($1, $2, $3, $4, 'active', $5)
            RETURNING user_id, email, display_name, avatar_url, phone, address,
                      role, status, created_by, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(email)
        .bind(display_name)
        .bind(role)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create a profile if none exists, then read it back. Safe to call
    /// repeatedly for the same user.
    pub async fn ensure_profile(
        &self,
        user_id: Uuid,
        email: &str,
        display_name: Option<&str>,
        role: &str,
        created_by: Option<Uuid>,
    ) -> Result<ProfileEntity, sqlx::Error> {
        let timer = QueryTimer::new("ensure_profile");
        sqlx::query(
            r#"
            INSERT INTO profiles (user_id, email, display_name, role, status, created_by)
            VALUES ($1, $2, $3, $4, 'active', $5)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(email)
        .bind(display_name)
        .bind(role)
        .bind(created_by)
        .execute(&self.pool)
        .await?;

        let result = sqlx::query_as::<_, ProfileEntity>(
            r#"
            SELECT user_id, email, display_name, avatar_url, phone, address,
                   role, status, created_by, created_at, updated_at
            FROM profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update the editable profile fields. Unset options leave the column
    /// untouched.
    pub async fn update_fields(
        &self,
        user_id: Uuid,
        display_name: Option<&str>,
        avatar_url: Option<&str>,
        phone: Option<&str>,
        address: Option<&str>,
    ) -> Result<Option<ProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_profile_fields");
        let result = sqlx::query_as::<_, ProfileEntity>(
            r#"
            UPDATE profiles
            SET display_name = COALESCE($2, display_name),
                avatar_url = COALESCE($3, avatar_url),
                phone = COALESCE($4, phone),
                address = COALESCE($5, address),
                updated_at = NOW()
            WHERE user_id = $1
            RETURNING user_id, email, display_name, avatar_url, phone, address,
                      role, status, created_by, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(display_name)
        .bind(avatar_url)
        .bind(phone)
        .bind(address)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Set the profile's role column.
    pub async fn set_role(
        &self,
        user_id: Uuid,
        role: &str,
    ) -> Result<Option<ProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("set_profile_role");
        let result = sqlx::query_as::<_, ProfileEntity>(
            r#"
            UPDATE profiles
            SET role = $2, updated_at = NOW()
            WHERE user_id = $1
            RETURNING user_id, email, display_name, avatar_url, phone, address,
                      role, status, created_by, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Set the profile's status column (active/blocked).
    pub async fn set_status(
        &self,
        user_id: Uuid,
        status: &str,
    ) -> Result<Option<ProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("set_profile_status");
        let result = sqlx::query_as::<_, ProfileEntity>(
            r#"
            UPDATE profiles
            SET status = $2, updated_at = NOW()
            WHERE user_id = $1
            RETURNING user_id, email, display_name, avatar_url, phone, address,
                      role, status, created_by, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List profiles, newest first.
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<ProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_profiles");
        let result = sqlx::query_as::<_, ProfileEntity>(
            r#"
            SELECT user_id, email, display_name, avatar_url, phone, address,
                   role, status, created_by, created_at, updated_at
            FROM profiles
            ORDER BY created_at DESC
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

    /// Count all profiles.
    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_profiles");
        let result = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM profiles")
            .fetch_one(&self.pool)
            .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    // Note: ProfileRepository tests require database connection and are covered by integration tests
}
