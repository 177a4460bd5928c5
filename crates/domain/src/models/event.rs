//! Scheduled site events that can override page layouts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventValidationError {
    #[error("Event end time must be after start time")]
    EndBeforeStart,
    #[error("Event name cannot be empty")]
    EmptyName,
}

/// A time-windowed event (derby day, cup final, anniversary) that can pin a
/// dedicated layout to one or more pages while the window is open.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventConfig {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub enabled: bool,
    /// Layout to use per page while the event is current.
    pub layout_overrides: Vec<LayoutOverride>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutOverride {
    pub page: String,
    pub layout_id: Uuid,
}

impl EventConfig {
    /// An event is current when it is enabled and `now` falls inside its
    /// window. Start is inclusive, end exclusive.
    pub fn is_current(&self, now: DateTime<Utc>) -> bool {
        self.enabled && now >= self.starts_at && now < self.ends_at
    }

    /// Layout override for `page`, if the event carries one.
    pub fn override_for_page(&self, page: &str) -> Option<Uuid> {
        self.layout_overrides
            .iter()
            .find(|o| o.page == page)
            .map(|o| o.layout_id)
    }

    pub fn validate_window(
        name: &str,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> Result<(), EventValidationError> {
        if name.trim().is_empty() {
            return Err(EventValidationError::EmptyName);
        }
        if ends_at <= starts_at {
            return Err(EventValidationError::EndBeforeStart);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn event(enabled: bool, start_offset_h: i64, end_offset_h: i64) -> EventConfig {
        let now = Utc::now();
        EventConfig {
            id: Uuid::new_v4(),
            name: "Derby Day".to_string(),
            description: None,
            starts_at: now + Duration::hours(start_offset_h),
            ends_at: now + Duration::hours(end_offset_h),
            enabled,
            layout_overrides: vec![LayoutOverride {
                page: "home".to_string(),
                layout_id: Uuid::new_v4(),
            }],
            created_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_event_current_inside_window() {
        assert!(event(true, -1, 1).is_current(Utc::now()));
    }

    #[test]
    fn test_event_not_current_outside_window() {
        let now = Utc::now();
        assert!(!event(true, 1, 2).is_current(now));
        assert!(!event(true, -2, -1).is_current(now));
    }

    #[test]
    fn test_disabled_event_never_current() {
        assert!(!event(false, -1, 1).is_current(Utc::now()));
    }

    #[test]
    fn test_window_boundaries() {
        let e = event(true, 0, 1);
        assert!(e.is_current(e.starts_at));
        assert!(!e.is_current(e.ends_at));
    }

    #[test]
    fn test_override_lookup() {
        let e = event(true, -1, 1);
        assert!(e.override_for_page("home").is_some());
        assert!(e.override_for_page("store").is_none());
    }

    #[test]
    fn test_window_validation() {
        let now = Utc::now();
        assert!(EventConfig::validate_window("Final", now, now + Duration::hours(1)).is_ok());
        assert_eq!(
            EventConfig::validate_window("Final", now, now),
            Err(EventValidationError::EndBeforeStart)
        );
        assert_eq!(
            EventConfig::validate_window("  ", now, now + Duration::hours(1)),
            Err(EventValidationError::EmptyName)
        );
    }
}
