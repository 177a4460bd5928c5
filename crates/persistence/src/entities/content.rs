//! Content entities (database row mappings): players, fixtures, records,
//! products, gallery, teams, navigation and the announcement singleton.

use chrono::{DateTime, Utc};
use domain::models::content::{AnnouncementSeverity, FixtureStatus, PlayerPosition};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the players table.
#[derive(Debug, Clone, FromRow)]
pub struct PlayerEntity {
    pub id: Uuid,
    pub name: String,
    pub jersey_number: i16,
    pub position: String,
    pub team_id: Option<Uuid>,
    pub photo_url: Option<String>,
    pub bio: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PlayerEntity> for domain::models::Player {
    fn from(entity: PlayerEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            jersey_number: entity.jersey_number,
            position: parse_position(&entity.position),
            team_id: entity.team_id,
            photo_url: entity.photo_url,
            bio: entity.bio,
            active: entity.active,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

fn parse_position(s: &str) -> PlayerPosition {
    match s {
        "goalkeeper" => PlayerPosition::Goalkeeper,
        "defender" => PlayerPosition::Defender,
        "midfielder" => PlayerPosition::Midfielder,
        _ => PlayerPosition::Forward,
    }
}

/// Database row mapping for the fixtures table.
#[derive(Debug, Clone, FromRow)]
pub struct FixtureEntity {
    pub id: Uuid,
    pub competition: String,
    pub home_team: String,
    pub away_team: String,
    pub kickoff_at: DateTime<Utc>,
    pub venue: Option<String>,
    pub status: String,
    pub home_score: Option<i16>,
    pub away_score: Option<i16>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<FixtureEntity> for domain::models::Fixture {
    fn from(entity: FixtureEntity) -> Self {
        let status = match entity.status.as_str() {
            "live" => FixtureStatus::Live,
            "finished" => FixtureStatus::Finished,
            "postponed" => FixtureStatus::Postponed,
            "cancelled" => FixtureStatus::Cancelled,
            _ => FixtureStatus::Scheduled,
        };
        Self {
            id: entity.id,
            competition: entity.competition,
            home_team: entity.home_team,
            away_team: entity.away_team,
            kickoff_at: entity.kickoff_at,
            venue: entity.venue,
            status,
            home_score: entity.home_score,
            away_score: entity.away_score,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Database row mapping for the records table.
#[derive(Debug, Clone, FromRow)]
pub struct RecordEntity {
    pub id: Uuid,
    pub category: String,
    pub title: String,
    pub holder: String,
    pub value: String,
    pub achieved_on: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RecordEntity> for domain::models::RecordEntry {
    fn from(entity: RecordEntity) -> Self {
        Self {
            id: entity.id,
            category: entity.category,
            title: entity.title,
            holder: entity.holder,
            value: entity.value,
            achieved_on: entity.achieved_on,
            notes: entity.notes,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Database row mapping for the products table.
#[derive(Debug, Clone, FromRow)]
pub struct ProductEntity {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price_minor: i64,
    pub currency: String,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub featured: bool,
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductEntity> for domain::models::Product {
    fn from(entity: ProductEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            description: entity.description,
            price_minor: entity.price_minor,
            currency: entity.currency,
            image_url: entity.image_url,
            category: entity.category,
            featured: entity.featured,
            in_stock: entity.in_stock,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Database row mapping for the gallery_items table.
#[derive(Debug, Clone, FromRow)]
pub struct GalleryItemEntity {
    pub id: Uuid,
    pub title: Option<String>,
    pub media_url: String,
    pub thumbnail_url: Option<String>,
    pub album: Option<String>,
    pub taken_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<GalleryItemEntity> for domain::models::GalleryItem {
    fn from(entity: GalleryItemEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            media_url: entity.media_url,
            thumbnail_url: entity.thumbnail_url,
            album: entity.album,
            taken_at: entity.taken_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Database row mapping for the teams table.
#[derive(Debug, Clone, FromRow)]
pub struct TeamEntity {
    pub id: Uuid,
    pub name: String,
    pub division: Option<String>,
    pub coach: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TeamEntity> for domain::models::Team {
    fn from(entity: TeamEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            division: entity.division,
            coach: entity.coach,
            photo_url: entity.photo_url,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Database row mapping for the nav_links table.
#[derive(Debug, Clone, FromRow)]
pub struct NavLinkEntity {
    pub id: Uuid,
    pub label: String,
    pub href: String,
    pub position: i32,
    pub visible: bool,
    pub external: bool,
}

impl From<NavLinkEntity> for domain::models::NavLink {
    fn from(entity: NavLinkEntity) -> Self {
        Self {
            id: entity.id,
            label: entity.label,
            href: entity.href,
            order: entity.position,
            visible: entity.visible,
            external: entity.external,
        }
    }
}

/// Database row mapping for the announcement singleton table.
#[derive(Debug, Clone, FromRow)]
pub struct AnnouncementEntity {
    pub message: String,
    pub severity: String,
    pub enabled: bool,
    pub link_href: Option<String>,
    pub updated_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

impl From<AnnouncementEntity> for domain::models::Announcement {
    fn from(entity: AnnouncementEntity) -> Self {
        let severity = match entity.severity.as_str() {
            "warning" => AnnouncementSeverity::Warning,
            "critical" => AnnouncementSeverity::Critical,
            _ => AnnouncementSeverity::Info,
        };
        Self {
            message: entity.message,
            severity,
            enabled: entity.enabled,
            link_href: entity.link_href,
            updated_by: entity.updated_by,
            updated_at: entity.updated_at,
        }
    }
}
