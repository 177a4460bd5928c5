//! Public content domain models: squad, fixtures, club records, store
//! products, gallery, teams, navigation and the site announcement.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Days after a fixture or record date during which edits stay open.
/// Past that window the entry is treated as historical and locked.
pub const EDIT_LOCK_DAYS: i64 = 15;

/// Returns true when `occurred_at` lies more than `lock_days` in the past,
/// meaning the entry can no longer be edited or deleted.
pub fn is_edit_locked(occurred_at: DateTime<Utc>, now: DateTime<Utc>, lock_days: i64) -> bool {
    now - occurred_at > Duration::days(lock_days)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerPosition {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: Uuid,
    pub name: String,
    pub jersey_number: i16,
    pub position: PlayerPosition,
    pub team_id: Option<Uuid>,
    pub photo_url: Option<String>,
    pub bio: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixtureStatus {
    Scheduled,
    Live,
    Finished,
    Postponed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fixture {
    pub id: Uuid,
    pub competition: String,
    pub home_team: String,
    pub away_team: String,
    pub kickoff_at: DateTime<Utc>,
    pub venue: Option<String>,
    pub status: FixtureStatus,
    pub home_score: Option<i16>,
    pub away_score: Option<i16>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Fixture {
    /// Finished fixtures become historical after the lock window.
    pub fn is_locked(&self, now: DateTime<Utc>, lock_days: i64) -> bool {
        self.status == FixtureStatus::Finished && is_edit_locked(self.kickoff_at, now, lock_days)
    }
}

/// A club record book entry (biggest win, top scorer in a season, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordEntry {
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

impl RecordEntry {
    pub fn is_locked(&self, now: DateTime<Utc>, lock_days: i64) -> bool {
        is_edit_locked(self.achieved_on, now, lock_days)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Price in minor units (cents) to avoid float money.
    pub price_minor: i64,
    pub currency: String,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub featured: bool,
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryItem {
    pub id: Uuid,
    pub title: Option<String>,
    pub media_url: String,
    pub thumbnail_url: Option<String>,
    pub album: Option<String>,
    pub taken_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    /// Age group or level, e.g. "U17" or "First Team".
    pub division: Option<String>,
    pub coach: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavLink {
    pub id: Uuid,
    pub label: String,
    pub href: String,
    pub order: i32,
    pub visible: bool,
    pub external: bool,
}

/// Site-wide announcement banner. A singleton: there is at most one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    pub message: String,
    pub severity: AnnouncementSeverity,
    pub enabled: bool,
    pub link_href: Option<String>,
    pub updated_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnouncementSeverity {
    Info,
    Warning,
    Critical,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_lock_window() {
        let now = Utc::now();
        assert!(!is_edit_locked(now - Duration::days(14), now, EDIT_LOCK_DAYS));
        assert!(!is_edit_locked(now - Duration::days(15), now, EDIT_LOCK_DAYS));
        assert!(is_edit_locked(
            now - Duration::days(15) - Duration::hours(1),
            now,
            EDIT_LOCK_DAYS
        ));
        assert!(is_edit_locked(now - Duration::days(40), now, EDIT_LOCK_DAYS));
    }

    #[test]
    fn test_future_dates_never_locked() {
        let now = Utc::now();
        assert!(!is_edit_locked(now + Duration::days(3), now, EDIT_LOCK_DAYS));
    }

    fn fixture(status: FixtureStatus, kickoff_offset_days: i64) -> Fixture {
        let now = Utc::now();
        Fixture {
            id: Uuid::new_v4(),
            competition: "League".to_string(),
            home_team: "Home FC".to_string(),
            away_team: "Away FC".to_string(),
            kickoff_at: now + Duration::days(kickoff_offset_days),
            venue: None,
            status,
            home_score: None,
            away_score: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_old_finished_fixture_locked() {
        let f = fixture(FixtureStatus::Finished, -30);
        assert!(f.is_locked(Utc::now(), EDIT_LOCK_DAYS));
    }

    #[test]
    fn test_recent_finished_fixture_editable() {
        let f = fixture(FixtureStatus::Finished, -3);
        assert!(!f.is_locked(Utc::now(), EDIT_LOCK_DAYS));
    }

    #[test]
    fn test_postponed_old_fixture_not_locked() {
        // Only finished matches become historical; a postponed fixture from
        // last month still needs rescheduling.
        let f = fixture(FixtureStatus::Postponed, -30);
        assert!(!f.is_locked(Utc::now(), EDIT_LOCK_DAYS));
    }

    #[test]
    fn test_record_entry_lock() {
        let now = Utc::now();
        let entry = RecordEntry {
            id: Uuid::new_v4(),
            category: "goals".to_string(),
            title: "Most goals in a season".to_string(),
            holder: "J. Kovac".to_string(),
            value: "41".to_string(),
            achieved_on: now - Duration::days(100),
            notes: None,
            created_at: now,
            updated_at: now,
        };
        assert!(entry.is_locked(now, EDIT_LOCK_DAYS));
    }

    #[test]
    fn test_player_position_serde_tags() {
        let json = serde_json::to_value(&PlayerPosition::Goalkeeper).unwrap();
        assert_eq!(json, "goalkeeper");
        let pos: PlayerPosition = serde_json::from_value(serde_json::json!("forward")).unwrap();
        assert_eq!(pos, PlayerPosition::Forward);
    }
}
