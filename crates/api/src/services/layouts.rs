//! Layout resolution and activation.
//!
//! Resolution is a pure function in the domain crate; this service feeds
//! it database state and projects the result for the public endpoint.

use chrono::Utc;
use domain::models::{EventConfig, LayoutConfig};
use domain::services::{resolve_layout, ResolutionSource};
use persistence::repositories::{EventRepository, LayoutRepository};
use sqlx::PgPool;
use std::collections::BTreeMap;
use uuid::Uuid;

/// A layout chosen for rendering, with its provenance and the CSS
/// variable projection of its theme.
#[derive(Debug, Clone)]
pub struct ResolvedLayout {
    pub layout: LayoutConfig,
    pub source: ResolutionSource,
    pub event_id: Option<Uuid>,
    pub css_variables: BTreeMap<String, String>,
}

/// Service for layout resolution against current database state.
#[derive(Clone)]
pub struct LayoutService {
    pool: PgPool,
}

impl LayoutService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Resolve the layout to render for a page right now.
    ///
    /// A current enabled event with an override for the page wins over
    /// the page's active layout. None means the caller falls back to its
    /// static default.
    pub async fn active_layout_for_page(
        &self,
        page: &str,
    ) -> Result<Option<ResolvedLayout>, sqlx::Error> {
        let now = Utc::now();

        let layout_repo = LayoutRepository::new(self.pool.clone());
        let event_repo = EventRepository::new(self.pool.clone());

        let layouts: Vec<LayoutConfig> = layout_repo
            .list_by_page(page)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
        let events: Vec<EventConfig> = event_repo
            .list_current(now)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        let Some(resolution) = resolve_layout(page, &layouts, &events, now) else {
            return Ok(None);
        };

        // The resolved id may point at an event-override layout that is
        // not in the page set loaded above.
        let layout = match layouts.iter().find(|l| l.id == resolution.layout_id) {
            Some(layout) => layout.clone(),
            None => match layout_repo.find_by_id(resolution.layout_id).await? {
                Some(entity) => entity.into(),
                None => return Ok(None),
            },
        };

        let css_variables = layout.theme.to_css_variables();

        Ok(Some(ResolvedLayout {
            layout,
            source: resolution.source,
            event_id: resolution.event_id,
            css_variables,
        }))
    }
}

#[cfg(test)]
mod tests {
    // Note: LayoutService resolution requires database connection and is covered by integration tests;
    // the resolution ordering itself is unit-tested in the domain crate.
}
