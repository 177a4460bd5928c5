//! Layout resolution for public pages.
//!
//! Pure selection logic: given the scheduled events and the stored layouts
//! for a page, decide which layout the page should render right now. Event
//! overrides win over the page's active layout; among overlapping current
//! events the most recently started one wins.

use crate::models::{EventConfig, LayoutConfig};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Where the resolved layout came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    /// A current event pinned this layout to the page.
    EventOverride,
    /// The page's active layout.
    Active,
}

#[derive(Debug, Clone)]
pub struct LayoutResolution {
    pub layout_id: Uuid,
    pub source: ResolutionSource,
    /// Set when an event supplied the layout.
    pub event_id: Option<Uuid>,
}

/// Resolves the layout to render for `page` at `now`.
///
/// `layouts` are the stored layouts for the page; `events` may span any
/// pages, non-current and non-matching ones are skipped. Returns `None`
/// when the page has no active layout and no event override.
pub fn resolve_layout(
    page: &str,
    layouts: &[LayoutConfig],
    events: &[EventConfig],
    now: DateTime<Utc>,
) -> Option<LayoutResolution> {
    let mut current: Vec<&EventConfig> = events
        .iter()
        .filter(|e| e.is_current(now) && e.override_for_page(page).is_some())
        .collect();
    current.sort_by_key(|e| e.starts_at);

    if let Some(event) = current.last() {
        // override_for_page is Some by the filter above
        if let Some(layout_id) = event.override_for_page(page) {
            return Some(LayoutResolution {
                layout_id,
                source: ResolutionSource::EventOverride,
                event_id: Some(event.id),
            });
        }
    }

    // Among several active rows the most recently created one wins;
    // editing an older layout does not reorder them.
    layouts
        .iter()
        .filter(|l| l.page == page && l.active)
        .max_by_key(|l| l.created_at)
        .map(|l| LayoutResolution {
            layout_id: l.id,
            source: ResolutionSource::Active,
            event_id: None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::LayoutOverride;
    use crate::models::ThemeConfig;
    use chrono::Duration;

    fn layout(page: &str, active: bool, created_offset_h: i64) -> LayoutConfig {
        let now = Utc::now();
        LayoutConfig {
            id: Uuid::new_v4(),
            page: page.to_string(),
            name: format!("{} layout", page),
            active,
            sections: Vec::new(),
            theme: ThemeConfig::default(),
            version: 1,
            created_by: None,
            created_at: now + Duration::hours(created_offset_h),
            updated_at: now,
        }
    }

    fn event(page: &str, layout_id: Uuid, start_offset_h: i64, end_offset_h: i64) -> EventConfig {
        let now = Utc::now();
        EventConfig {
            id: Uuid::new_v4(),
            name: "Cup Final".to_string(),
            description: None,
            starts_at: now + Duration::hours(start_offset_h),
            ends_at: now + Duration::hours(end_offset_h),
            enabled: true,
            layout_overrides: vec![LayoutOverride {
                page: page.to_string(),
                layout_id,
            }],
            created_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_active_layout_when_no_events() {
        let layouts = vec![layout("home", true, 0), layout("home", false, 1)];
        let resolved = resolve_layout("home", &layouts, &[], Utc::now()).unwrap();
        assert_eq!(resolved.source, ResolutionSource::Active);
        assert_eq!(resolved.layout_id, layouts[0].id);
    }

    #[test]
    fn test_newest_active_layout_wins() {
        let layouts = vec![layout("home", true, 0), layout("home", true, 2)];
        let resolved = resolve_layout("home", &layouts, &[], Utc::now()).unwrap();
        assert_eq!(resolved.layout_id, layouts[1].id);
    }

    #[test]
    fn test_editing_older_active_layout_does_not_reorder() {
        let mut older = layout("home", true, -2);
        older.updated_at = Utc::now() + Duration::hours(5);
        let layouts = vec![older, layout("home", true, 0)];
        let resolved = resolve_layout("home", &layouts, &[], Utc::now()).unwrap();
        assert_eq!(resolved.layout_id, layouts[1].id);
    }

    #[test]
    fn test_event_override_beats_active_layout() {
        let layouts = vec![layout("home", true, 0)];
        let override_id = Uuid::new_v4();
        let events = vec![event("home", override_id, -1, 1)];

        let resolved = resolve_layout("home", &layouts, &events, Utc::now()).unwrap();
        assert_eq!(resolved.source, ResolutionSource::EventOverride);
        assert_eq!(resolved.layout_id, override_id);
        assert_eq!(resolved.event_id, Some(events[0].id));
    }

    #[test]
    fn test_expired_event_ignored() {
        let layouts = vec![layout("home", true, 0)];
        let events = vec![event("home", Uuid::new_v4(), -5, -2)];

        let resolved = resolve_layout("home", &layouts, &events, Utc::now()).unwrap();
        assert_eq!(resolved.source, ResolutionSource::Active);
    }

    #[test]
    fn test_event_for_other_page_ignored() {
        let layouts = vec![layout("home", true, 0)];
        let events = vec![event("store", Uuid::new_v4(), -1, 1)];

        let resolved = resolve_layout("home", &layouts, &events, Utc::now()).unwrap();
        assert_eq!(resolved.source, ResolutionSource::Active);
    }

    #[test]
    fn test_latest_starting_event_wins_among_overlaps() {
        let early = event("home", Uuid::new_v4(), -4, 2);
        let late = event("home", Uuid::new_v4(), -1, 2);
        let events = vec![early.clone(), late.clone()];

        let resolved = resolve_layout("home", &[], &events, Utc::now()).unwrap();
        assert_eq!(resolved.event_id, Some(late.id));
    }

    #[test]
    fn test_no_layout_resolves_to_none() {
        let layouts = vec![layout("home", false, 0)];
        assert!(resolve_layout("home", &layouts, &[], Utc::now()).is_none());
    }
}
