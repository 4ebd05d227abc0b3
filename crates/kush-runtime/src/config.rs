#![forbid(unsafe_code)]

//! Storefront configuration as data.
//!
//! [`StoreConfig`] gathers every tunable the page uses: the order number and
//! link style, endpoints, storage keys, tracker geometry, and notice timing.
//! It can be loaded from JSON (always) or TOML (`config-files` feature).
//!
//! ```toml
//! # kush.toml
//! store_name = "Kush Women's Fashion Store"
//!
//! [order]
//! number = "250785440056"
//! style = "short"
//!
//! [contact]
//! endpoint = "/contact/"
//! ```
//!
//! # Defaults
//!
//! `StoreConfig::default()` reproduces the storefront's built-in constants,
//! so a missing config file changes nothing.

use core::time::Duration;
use std::path::Path;

use kush_core::contact::DEFAULT_MAIL_RECIPIENT;
use kush_core::order::{DEFAULT_ORDER_NUMBER, DEFAULT_SITE_BASE, DEFAULT_STORE_NAME, LinkStyle, OrderLinkBuilder};
use kush_core::prefs::StorageKeys;
use kush_core::tracker::{DEFAULT_TRIGGER_MARGIN, NAV_CLICK_OFFSET};
use serde::{Deserialize, Serialize};

/// Configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error reading config: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "config-files")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {}", .0.join("; "))]
    Validation(Vec<String>),
}

/// Top-level storefront configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Greeting name used in order messages.
    pub store_name: String,
    pub order: OrderConfig,
    pub contact: ContactConfig,
    pub likes: LikeConfig,
    pub storage: StorageKeys,
    pub tracker: TrackerConfig,
    pub timing: TimingConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            store_name: DEFAULT_STORE_NAME.to_string(),
            order: OrderConfig::default(),
            contact: ContactConfig::default(),
            likes: LikeConfig::default(),
            storage: StorageKeys::default(),
            tracker: TrackerConfig::default(),
            timing: TimingConfig::default(),
        }
    }
}

/// WhatsApp ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderConfig {
    /// Recipient number, digits only, with country code.
    pub number: String,
    pub style: LinkStyle,
    /// Public site root for product deep links.
    pub site_base: String,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            number: DEFAULT_ORDER_NUMBER.to_string(),
            style: LinkStyle::default(),
            site_base: DEFAULT_SITE_BASE.to_string(),
        }
    }
}

/// Contact form delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    /// POST target. Without one the form falls back to a `mailto:` link.
    pub endpoint: Option<String>,
    pub mail_recipient: String,
    pub csrf_header: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            mail_recipient: DEFAULT_MAIL_RECIPIENT.to_string(),
            csrf_header: "X-CSRFToken".to_string(),
        }
    }
}

/// Server-side like counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LikeConfig {
    /// Endpoint path with an `{id}` placeholder.
    pub endpoint_template: String,
}

impl Default for LikeConfig {
    fn default() -> Self {
        Self {
            endpoint_template: "/clothes/{id}/like/".to_string(),
        }
    }
}

impl LikeConfig {
    #[must_use]
    pub fn endpoint_for(&self, product_id: u64) -> String {
        self.endpoint_template.replace("{id}", &product_id.to_string())
    }
}

/// Active-section tracking geometry, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Distance below the header at which a section counts as reached.
    pub margin: f64,
    /// Clearance below the header after a nav click scroll.
    pub click_offset: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            margin: DEFAULT_TRIGGER_MARGIN,
            click_offset: NAV_CLICK_OFFSET,
        }
    }
}

/// Transient UI timing, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub highlight_ms: u64,
    pub notice_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            highlight_ms: 3_000,
            notice_ms: 3_000,
        }
    }
}

impl TimingConfig {
    #[must_use]
    pub const fn highlight(&self) -> Duration {
        Duration::from_millis(self.highlight_ms)
    }

    #[must_use]
    pub const fn notice(&self) -> Duration {
        Duration::from_millis(self.notice_ms)
    }
}

impl StoreConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config-files")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-files")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.store_name.trim().is_empty() {
            errors.push("store_name must not be empty".into());
        }

        if self.order.number.is_empty() || !self.order.number.chars().all(|c| c.is_ascii_digit()) {
            errors.push(format!(
                "order.number must be digits only, got {:?}",
                self.order.number
            ));
        }

        if let Some(endpoint) = &self.contact.endpoint
            && endpoint.trim().is_empty()
        {
            errors.push("contact.endpoint must not be blank when set".into());
        }

        if self.contact.csrf_header.trim().is_empty() {
            errors.push("contact.csrf_header must not be empty".into());
        }

        if !self.likes.endpoint_template.contains("{id}") {
            errors.push(format!(
                "likes.endpoint_template must contain {{id}}, got {:?}",
                self.likes.endpoint_template
            ));
        }

        if self.storage.theme.is_empty() || self.storage.likes.is_empty() {
            errors.push("storage keys must not be empty".into());
        } else if self.storage.theme == self.storage.likes {
            errors.push("storage.theme and storage.likes must differ".into());
        }

        if !self.tracker.margin.is_finite() || self.tracker.margin < 0.0 {
            errors.push(format!("tracker.margin must be >= 0, got {}", self.tracker.margin));
        }

        if !self.tracker.click_offset.is_finite() || self.tracker.click_offset < 0.0 {
            errors.push(format!(
                "tracker.click_offset must be >= 0, got {}",
                self.tracker.click_offset
            ));
        }

        if self.timing.highlight_ms == 0 {
            errors.push("timing.highlight_ms must be > 0".into());
        }

        if self.timing.notice_ms == 0 {
            errors.push("timing.notice_ms must be > 0".into());
        }

        errors
    }

    /// Validate, converting a non-empty error list into [`ConfigError`].
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Order link builder for this store.
    #[must_use]
    pub fn order_links(&self) -> OrderLinkBuilder {
        OrderLinkBuilder::new(self.store_name.clone(), self.order.number.clone())
            .style(self.order.style)
            .site_base(self.order.site_base.clone())
    }
}
