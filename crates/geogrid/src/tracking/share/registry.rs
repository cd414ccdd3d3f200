use super::domain::{
    ShareLink, WidgetConfig, WidgetOptions, DEFAULT_EXPIRATION_DAYS,
};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use uuid::Uuid;

/// Lookup failures for share links. Expired links stay stored; they only
/// stop resolving.
#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    #[error("share link {0} not found")]
    NotFound(String),
    #[error("share link {0} has expired")]
    Expired(String),
}

fn generate_share_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Owned registry of public share links, keyed by generated id. Entries are
/// never implicitly evicted; expiry is a read-time check.
#[derive(Debug)]
pub struct ShareLinkRegistry {
    base_url: String,
    links: HashMap<String, ShareLink>,
}

impl ShareLinkRegistry {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            links: HashMap::new(),
        }
    }

    /// Inserts a new link wrapping `report` and returns it. Ids are v4 uuids
    /// in simple form: URL-safe, collisions negligible at link volume.
    pub fn create(
        &mut self,
        report: serde_json::Value,
        expiration_days: Option<i64>,
        now: DateTime<Utc>,
    ) -> ShareLink {
        let id = generate_share_id();
        let days = expiration_days.unwrap_or(DEFAULT_EXPIRATION_DAYS);
        let link = ShareLink {
            url: format!("{}/share/{id}", self.base_url.trim_end_matches('/')),
            id: id.clone(),
            report,
            created_at: now,
            expires_at: now + Duration::days(days),
            views: 0,
            is_active: true,
        };

        self.links.insert(id, link.clone());
        link
    }

    /// Resolves a link if it is still active and unexpired as of `now`.
    pub fn fetch(&self, id: &str, now: DateTime<Utc>) -> Result<&ShareLink, ShareError> {
        let link = self
            .links
            .get(id)
            .ok_or_else(|| ShareError::NotFound(id.to_owned()))?;
        if !link.is_active || link.is_expired(now) {
            return Err(ShareError::Expired(id.to_owned()));
        }
        Ok(link)
    }

    /// Counts one external access against the link, after the same
    /// active/expiry check as `fetch`.
    pub fn record_view(&mut self, id: &str, now: DateTime<Utc>) -> Result<&ShareLink, ShareError> {
        let link = self
            .links
            .get_mut(id)
            .ok_or_else(|| ShareError::NotFound(id.to_owned()))?;
        if !link.is_active || link.is_expired(now) {
            return Err(ShareError::Expired(id.to_owned()));
        }
        link.views += 1;
        Ok(link)
    }

    /// Deactivates a link without removing it.
    pub fn revoke(&mut self, id: &str) -> Result<(), ShareError> {
        let link = self
            .links
            .get_mut(id)
            .ok_or_else(|| ShareError::NotFound(id.to_owned()))?;
        link.is_active = false;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// Owned registry of embeddable-widget descriptors keyed by generated id.
#[derive(Debug, Default)]
pub struct WidgetRegistry {
    widgets: HashMap<String, WidgetConfig>,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, options: WidgetOptions, now: DateTime<Utc>) -> WidgetConfig {
        let id = generate_share_id();
        let widget = WidgetConfig::from_options(id.clone(), options, now);
        self.widgets.insert(id, widget.clone());
        widget
    }

    pub fn fetch(&self, id: &str) -> Option<&WidgetConfig> {
        self.widgets.get(id)
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}
