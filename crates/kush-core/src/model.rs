#![forbid(unsafe_code)]

//! Typed page content.
//!
//! These records are what the storefront markup is reduced to at the host
//! boundary (see [`crate::extract`]). None of them are mutated by the core;
//! filtering and tracking only read them.

use serde::{Deserialize, Serialize};

/// A rendered collection card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCard {
    /// Card heading text.
    pub title: String,
    /// Visible sub-item labels (model names) in document order.
    #[serde(default)]
    pub labels: Vec<String>,
}

impl ProductCard {
    #[must_use]
    pub fn new(title: impl Into<String>, labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            title: title.into(),
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    /// Space-joined label text, the haystack for label matches.
    #[must_use]
    pub fn joined_labels(&self) -> String {
        self.labels.join(" ")
    }
}

/// A tracked page section: an anchor and its distance from the document top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub identifier: String,
    pub offset: f64,
}

impl Section {
    #[must_use]
    pub fn new(identifier: impl Into<String>, offset: f64) -> Self {
        Self {
            identifier: identifier.into(),
            offset,
        }
    }
}

/// A navigation link.
///
/// `anchor` is only set when the href carries a fragment that names an
/// element present on the page; entries without one are never tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavEntry {
    pub href: String,
    #[serde(default)]
    pub anchor: Option<String>,
}

impl NavEntry {
    #[must_use]
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            anchor: None,
        }
    }

    /// True when the href is a same-page fragment link (`#name`).
    #[must_use]
    pub fn is_fragment_link(&self) -> bool {
        self.href.starts_with('#')
    }
}

/// Item availability as recorded by the store back office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    #[default]
    Available,
    Sold,
}

impl Availability {
    /// Parse the back-office status string. Unknown values yield `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "available" => Some(Self::Available),
            "sold" => Some(Self::Sold),
            _ => None,
        }
    }

    /// Display label used in order messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Sold => "Sold",
        }
    }
}

/// A category as listed on the landing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
}

impl CatalogRecord {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

/// A single garment listed under a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: Option<Availability>,
    /// Page anchor of the item's card, used for deep links.
    #[serde(default)]
    pub anchor: Option<String>,
}

impl CatalogItem {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            category: None,
            status: None,
            anchor: None,
        }
    }
}

/// Anything the search can match against.
pub trait DisplayName {
    fn display_name(&self) -> &str;
}

impl DisplayName for CatalogRecord {
    fn display_name(&self) -> &str {
        &self.name
    }
}

impl DisplayName for CatalogItem {
    fn display_name(&self) -> &str {
        &self.name
    }
}

impl DisplayName for String {
    fn display_name(&self) -> &str {
        self
    }
}

impl DisplayName for &str {
    fn display_name(&self) -> &str {
        self
    }
}
