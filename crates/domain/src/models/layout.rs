//! Page layout, section and theme domain models.
//!
//! A layout is an ordered, versioned list of content sections assigned to a
//! page; at most one layout per page is active at a time. Section payloads
//! are a closed tagged variant per section kind, so rendering dispatch is
//! covered at compile time instead of an open config map.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// A single section inside a layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Stable identifier within the layout, used by the editor UI.
    pub id: String,
    pub order: i32,
    pub visible: bool,
    #[serde(flatten)]
    pub config: SectionConfig,
}

/// Typed configuration per section kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SectionConfig {
    Hero(HeroConfig),
    News(NewsConfig),
    Fixtures(FixturesConfig),
    Players(PlayersConfig),
    Gallery(GalleryConfig),
    Products(ProductsConfig),
    LeagueTable(LeagueTableConfig),
    Sponsors(SponsorsConfig),
    RichText(RichTextConfig),
}

impl SectionConfig {
    /// Stable tag name for this section kind.
    pub fn kind(&self) -> &'static str {
        match self {
            SectionConfig::Hero(_) => "hero",
            SectionConfig::News(_) => "news",
            SectionConfig::Fixtures(_) => "fixtures",
            SectionConfig::Players(_) => "players",
            SectionConfig::Gallery(_) => "gallery",
            SectionConfig::Products(_) => "products",
            SectionConfig::LeagueTable(_) => "league_table",
            SectionConfig::Sponsors(_) => "sponsors",
            SectionConfig::RichText(_) => "rich_text",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HeroConfig {
    pub title: String,
    pub subtitle: Option<String>,
    pub background_url: Option<String>,
    pub cta_label: Option<String>,
    pub cta_href: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsConfig {
    pub limit: u32,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixturesConfig {
    pub limit: u32,
    /// Show finished matches with scores alongside upcoming ones.
    pub show_results: bool,
    pub team_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayersConfig {
    pub team_id: Option<Uuid>,
    pub limit: u32,
    pub group_by_position: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryConfig {
    pub album: Option<String>,
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductsConfig {
    pub limit: u32,
    pub featured_only: bool,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LeagueTableConfig {
    pub competition: Option<String>,
    pub highlight_team_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SponsorsConfig {
    pub heading: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RichTextConfig {
    pub html: String,
}

/// Color palette of a theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorPalette {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub dark: String,
    pub light: String,
    pub success: String,
    pub warning: String,
    pub error: String,
    pub text: TextPalette,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPalette {
    pub primary: String,
    pub secondary: String,
    pub muted: String,
}

/// Typography settings: font family triple plus size/weight scales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Typography {
    pub font_heading: String,
    pub font_body: String,
    pub font_mono: String,
    pub size_sm: String,
    pub size_base: String,
    pub size_lg: String,
    pub weight_normal: u16,
    pub weight_medium: u16,
    pub weight_bold: u16,
}

/// Animation profile styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationStyle {
    None,
    Subtle,
    Dynamic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationProfile {
    pub style: AnimationStyle,
    pub duration_fast_ms: u32,
    pub duration_base_ms: u32,
    pub duration_slow_ms: u32,
    pub easing: String,
}

/// A named bundle of color/typography/animation/spacing values, projected
/// onto global style variables by the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub name: String,
    pub colors: ColorPalette,
    pub typography: Typography,
    pub animation: AnimationProfile,
    pub spacing_sm: String,
    pub spacing_base: String,
    pub spacing_lg: String,
}

impl ThemeConfig {
    /// Projects the theme onto CSS custom properties. Pure: the map is what
    /// the public layout endpoint ships for the frontend to apply.
    pub fn to_css_variables(&self) -> BTreeMap<String, String> {
        let mut vars = BTreeMap::new();

        vars.insert("--color-primary".into(), self.colors.primary.clone());
        vars.insert("--color-secondary".into(), self.colors.secondary.clone());
        vars.insert("--color-accent".into(), self.colors.accent.clone());
        vars.insert("--color-dark".into(), self.colors.dark.clone());
        vars.insert("--color-light".into(), self.colors.light.clone());
        vars.insert("--color-success".into(), self.colors.success.clone());
        vars.insert("--color-warning".into(), self.colors.warning.clone());
        vars.insert("--color-error".into(), self.colors.error.clone());
        vars.insert("--text-primary".into(), self.colors.text.primary.clone());
        vars.insert("--text-secondary".into(), self.colors.text.secondary.clone());
        vars.insert("--text-muted".into(), self.colors.text.muted.clone());

        vars.insert("--font-heading".into(), self.typography.font_heading.clone());
        vars.insert("--font-body".into(), self.typography.font_body.clone());
        vars.insert("--font-mono".into(), self.typography.font_mono.clone());
        vars.insert("--font-size-sm".into(), self.typography.size_sm.clone());
        vars.insert("--font-size-base".into(), self.typography.size_base.clone());
        vars.insert("--font-size-lg".into(), self.typography.size_lg.clone());
        vars.insert(
            "--font-weight-normal".into(),
            self.typography.weight_normal.to_string(),
        );
        vars.insert(
            "--font-weight-medium".into(),
            self.typography.weight_medium.to_string(),
        );
        vars.insert(
            "--font-weight-bold".into(),
            self.typography.weight_bold.to_string(),
        );

        vars.insert(
            "--anim-duration-fast".into(),
            format!("{}ms", self.animation.duration_fast_ms),
        );
        vars.insert(
            "--anim-duration-base".into(),
            format!("{}ms", self.animation.duration_base_ms),
        );
        vars.insert(
            "--anim-duration-slow".into(),
            format!("{}ms", self.animation.duration_slow_ms),
        );
        vars.insert("--anim-easing".into(), self.animation.easing.clone());

        vars.insert("--spacing-sm".into(), self.spacing_sm.clone());
        vars.insert("--spacing-base".into(), self.spacing_base.clone());
        vars.insert("--spacing-lg".into(), self.spacing_lg.clone());

        vars
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: "club-default".to_string(),
            colors: ColorPalette {
                primary: "#b91c1c".to_string(),
                secondary: "#1e3a8a".to_string(),
                accent: "#f59e0b".to_string(),
                dark: "#111827".to_string(),
                light: "#f9fafb".to_string(),
                success: "#16a34a".to_string(),
                warning: "#d97706".to_string(),
                error: "#dc2626".to_string(),
                text: TextPalette {
                    primary: "#111827".to_string(),
                    secondary: "#374151".to_string(),
                    muted: "#9ca3af".to_string(),
                },
            },
            typography: Typography {
                font_heading: "'Archivo', sans-serif".to_string(),
                font_body: "'Inter', sans-serif".to_string(),
                font_mono: "'JetBrains Mono', monospace".to_string(),
                size_sm: "0.875rem".to_string(),
                size_base: "1rem".to_string(),
                size_lg: "1.25rem".to_string(),
                weight_normal: 400,
                weight_medium: 500,
                weight_bold: 700,
            },
            animation: AnimationProfile {
                style: AnimationStyle::Subtle,
                duration_fast_ms: 150,
                duration_base_ms: 300,
                duration_slow_ms: 600,
                easing: "cubic-bezier(0.4, 0, 0.2, 1)".to_string(),
            },
            spacing_sm: "0.5rem".to_string(),
            spacing_base: "1rem".to_string(),
            spacing_lg: "2rem".to_string(),
        }
    }
}

/// A page layout: ordered sections plus an embedded theme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub id: Uuid,
    /// Page this layout belongs to (e.g. "home", "fixtures", "store").
    pub page: String,
    pub name: String,
    pub active: bool,
    pub sections: Vec<Section>,
    pub theme: ThemeConfig,
    pub version: i32,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LayoutConfig {
    /// Sections in render order, hidden ones filtered out.
    pub fn visible_sections(&self) -> Vec<&Section> {
        let mut sections: Vec<&Section> = self.sections.iter().filter(|s| s.visible).collect();
        sections.sort_by_key(|s| s.order);
        sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hero_section(order: i32, visible: bool) -> Section {
        Section {
            id: format!("hero-{}", order),
            order,
            visible,
            config: SectionConfig::Hero(HeroConfig {
                title: "Welcome".to_string(),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn test_section_serializes_with_type_tag() {
        let section = Section {
            id: "news-1".to_string(),
            order: 2,
            visible: true,
            config: SectionConfig::News(NewsConfig {
                limit: 5,
                category: None,
            }),
        };

        let json = serde_json::to_value(&section).unwrap();
        assert_eq!(json["type"], "news");
        assert_eq!(json["limit"], 5);
        assert_eq!(json["order"], 2);
    }

    #[test]
    fn test_section_deserializes_from_tagged_json() {
        let json = serde_json::json!({
            "id": "fx-1",
            "order": 1,
            "visible": true,
            "type": "fixtures",
            "limit": 3,
            "show_results": true,
            "team_id": null
        });

        let section: Section = serde_json::from_value(json).unwrap();
        match section.config {
            SectionConfig::Fixtures(cfg) => {
                assert_eq!(cfg.limit, 3);
                assert!(cfg.show_results);
            }
            other => panic!("Expected fixtures section, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_section_kind_rejected() {
        let json = serde_json::json!({
            "id": "x",
            "order": 1,
            "visible": true,
            "type": "countdown"
        });
        assert!(serde_json::from_value::<Section>(json).is_err());
    }

    #[test]
    fn test_section_kind_tags() {
        let cfg = SectionConfig::LeagueTable(LeagueTableConfig::default());
        assert_eq!(cfg.kind(), "league_table");
        let cfg = SectionConfig::RichText(RichTextConfig::default());
        assert_eq!(cfg.kind(), "rich_text");
    }

    #[test]
    fn test_visible_sections_sorted_and_filtered() {
        let layout = LayoutConfig {
            id: Uuid::new_v4(),
            page: "home".to_string(),
            name: "Default".to_string(),
            active: true,
            sections: vec![
                hero_section(3, true),
                hero_section(1, true),
                hero_section(2, false),
            ],
            theme: ThemeConfig::default(),
            version: 1,
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let visible = layout.visible_sections();
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[0].order, 1);
        assert_eq!(visible[1].order, 3);
    }

    #[test]
    fn test_theme_css_variables_projection() {
        let theme = ThemeConfig::default();
        let vars = theme.to_css_variables();

        assert_eq!(vars.get("--color-primary").unwrap(), "#b91c1c");
        assert_eq!(vars.get("--anim-duration-base").unwrap(), "300ms");
        assert_eq!(vars.get("--font-weight-bold").unwrap(), "700");
        assert_eq!(vars.get("--spacing-lg").unwrap(), "2rem");
    }

    #[test]
    fn test_theme_serialization_roundtrip() {
        let theme = ThemeConfig::default();
        let json = serde_json::to_string(&theme).unwrap();
        let back: ThemeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, theme);
    }
}
