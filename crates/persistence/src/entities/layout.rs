//! Layout entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Section, ThemeConfig};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the layouts table.
///
/// Sections and theme are stored as JSONB; deserialization into the typed
/// section variants happens here, so a malformed row surfaces as a decode
/// error instead of leaking raw JSON upward.
#[derive(Debug, Clone, FromRow)]
pub struct LayoutEntity {
    pub id: Uuid,
    pub page: String,
    pub name: String,
    pub active: bool,
    pub sections: Json<Vec<Section>>,
    pub theme: Json<ThemeConfig>,
    pub version: i32,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<LayoutEntity> for domain::models::LayoutConfig {
    fn from(entity: LayoutEntity) -> Self {
        Self {
            id: entity.id,
            page: entity.page,
            name: entity.name,
            active: entity.active,
            sections: entity.sections.0,
            theme: entity.theme.0,
            version: entity.version,
            created_by: entity.created_by,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
