use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Days a share link stays live when the caller does not choose a horizon.
pub const DEFAULT_EXPIRATION_DAYS: i64 = 30;

pub const DEFAULT_WIDGET_THEME: &str = "professional";

/// Low/medium/high rank colors used when the embedder supplies none.
pub const DEFAULT_WIDGET_COLORS: [&str; 3] = ["#ff4444", "#ffaa44", "#44ff44"];

/// Publicly shareable report handle. Expiration is recorded data checked at
/// read time; nothing here schedules a sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareLink {
    pub id: String,
    pub url: String,
    /// Embedded report payload; opaque to the registry.
    pub report: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub views: u32,
    pub is_active: bool,
}

impl ShareLink {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateFrequency {
    Hourly,
    Daily,
    Weekly,
}

impl UpdateFrequency {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }
}

impl Default for UpdateFrequency {
    fn default() -> Self {
        Self::Daily
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetStyling {
    pub theme: String,
    pub colors: Vec<String>,
    pub show_legend: bool,
    pub show_metrics: bool,
}

impl Default for WidgetStyling {
    fn default() -> Self {
        Self {
            theme: DEFAULT_WIDGET_THEME.to_owned(),
            colors: DEFAULT_WIDGET_COLORS.map(str::to_owned).to_vec(),
            show_legend: true,
            show_metrics: true,
        }
    }
}

/// Caller-supplied styling overrides; anything omitted keeps its default.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WidgetOptions {
    pub theme: Option<String>,
    pub colors: Option<Vec<String>>,
    pub show_legend: Option<bool>,
    pub show_metrics: Option<bool>,
    pub update_frequency: Option<UpdateFrequency>,
}

/// Embeddable-widget descriptor. Markup/script generation is a rendering
/// concern; consumers embed by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetConfig {
    pub id: String,
    pub styling: WidgetStyling,
    pub created_at: DateTime<Utc>,
    pub update_frequency: UpdateFrequency,
}

impl WidgetConfig {
    pub fn from_options(id: String, options: WidgetOptions, created_at: DateTime<Utc>) -> Self {
        let defaults = WidgetStyling::default();
        Self {
            id,
            styling: WidgetStyling {
                theme: options.theme.unwrap_or(defaults.theme),
                colors: options.colors.unwrap_or(defaults.colors),
                show_legend: options.show_legend.unwrap_or(defaults.show_legend),
                show_metrics: options.show_metrics.unwrap_or(defaults.show_metrics),
            },
            created_at,
            update_frequency: options.update_frequency.unwrap_or_default(),
        }
    }
}
