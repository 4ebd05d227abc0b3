#![forbid(unsafe_code)]

//! Typed extraction of page content at the host boundary.
//!
//! The host walks the markup (see [`crate::dom`]) and hands over a loosely
//! shaped JSON document. Every field is optional on the wire; this module
//! decides what is usable. A record missing a required field, or carrying a
//! field of the wrong type, is skipped and counted in the [`ExtractReport`];
//! only malformed JSON or a list that is not an array is an error.
//!
//! ```json
//! {
//!   "cards": [{ "title": "Red Dress", "labels": ["Model A"] }],
//!   "categories": [{ "id": 1, "name": "Silk Collection" }],
//!   "items": [{ "id": 7, "name": "Silk Scarf", "category": "Silk Collection",
//!               "status": "available", "anchor": "item-7" }],
//!   "nav": [{ "href": "#home" }, { "href": "/contact" }],
//!   "anchors": [{ "id": "home", "offset": 0 }],
//!   "header_height": 64
//! }
//! ```

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::anchor::build_sections;
use crate::model::{Availability, CatalogItem, CatalogRecord, NavEntry, ProductCard, Section};

/// Extraction failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// The document was not valid JSON of the expected outline.
    Json(String),
}

impl core::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "page snapshot JSON error: {msg}"),
        }
    }
}

impl std::error::Error for ExtractError {}

/// Page outline. Records stay untyped until each one is mapped on its own.
#[derive(Debug, Default, Deserialize)]
struct RawPage {
    #[serde(default)]
    cards: Vec<Value>,
    #[serde(default)]
    categories: Vec<Value>,
    #[serde(default)]
    items: Vec<Value>,
    #[serde(default)]
    nav: Vec<Value>,
    #[serde(default)]
    anchors: Vec<Value>,
    #[serde(default)]
    header_height: Option<Value>,
}

/// Map each record, counting the ones that do not fit `T`.
fn typed<T: DeserializeOwned>(values: Vec<Value>, skipped: &mut usize) -> Vec<T> {
    values
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::trace!(error = %_err, "page record skipped");
                *skipped += 1;
                None
            }
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct RawCard {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    labels: Vec<Option<String>>,
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    anchor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawNav {
    #[serde(default)]
    href: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawAnchor {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    offset: Option<f64>,
}

/// Counts of records dropped during extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ExtractReport {
    pub skipped_cards: usize,
    pub skipped_categories: usize,
    pub skipped_items: usize,
    pub skipped_nav: usize,
    pub skipped_anchors: usize,
}

impl ExtractReport {
    #[must_use]
    pub fn total_skipped(&self) -> usize {
        self.skipped_cards
            + self.skipped_categories
            + self.skipped_items
            + self.skipped_nav
            + self.skipped_anchors
    }
}

/// Everything the page logic reads from the current page.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PageSnapshot {
    pub cards: Vec<ProductCard>,
    pub categories: Vec<CatalogRecord>,
    pub items: Vec<CatalogItem>,
    pub nav: Vec<NavEntry>,
    /// Tracked sections, in nav order.
    pub sections: Vec<Section>,
    pub header_height: f64,
}

impl PageSnapshot {
    /// Parse and extract, discarding the report.
    pub fn from_json(json: &str) -> Result<Self, ExtractError> {
        Self::extract(json).map(|(snapshot, _)| snapshot)
    }

    /// Parse and extract, returning what was skipped.
    pub fn extract(json: &str) -> Result<(Self, ExtractReport), ExtractError> {
        let raw: RawPage =
            serde_json::from_str(json).map_err(|e| ExtractError::Json(e.to_string()))?;
        let (snapshot, report) = Self::from_raw(raw);
        #[cfg(feature = "tracing")]
        if report.total_skipped() > 0 {
            tracing::debug!(report = ?report, "page snapshot records skipped");
        }
        Ok((snapshot, report))
    }

    fn from_raw(raw: RawPage) -> (Self, ExtractReport) {
        let mut report = ExtractReport::default();

        let mut cards = Vec::with_capacity(raw.cards.len());
        for card in typed::<RawCard>(raw.cards, &mut report.skipped_cards) {
            match card.title {
                Some(title) => cards.push(ProductCard {
                    title,
                    labels: card.labels.into_iter().flatten().collect(),
                }),
                None => report.skipped_cards += 1,
            }
        }

        let mut categories = Vec::with_capacity(raw.categories.len());
        for record in typed::<RawRecord>(raw.categories, &mut report.skipped_categories) {
            match record.name {
                Some(name) => categories.push(CatalogRecord { id: record.id, name }),
                None => report.skipped_categories += 1,
            }
        }

        let mut items = Vec::with_capacity(raw.items.len());
        for item in typed::<RawItem>(raw.items, &mut report.skipped_items) {
            let Some(name) = item.name else {
                report.skipped_items += 1;
                continue;
            };
            items.push(CatalogItem {
                id: item.id,
                name,
                category: item.category,
                status: item.status.as_deref().and_then(Availability::parse),
                anchor: item.anchor.filter(|a| !a.is_empty()),
            });
        }

        let mut nav = Vec::with_capacity(raw.nav.len());
        for entry in typed::<RawNav>(raw.nav, &mut report.skipped_nav) {
            match entry.href {
                Some(href) => nav.push(NavEntry::new(href)),
                None => report.skipped_nav += 1,
            }
        }

        let mut anchors = HashMap::with_capacity(raw.anchors.len());
        for anchor in typed::<RawAnchor>(raw.anchors, &mut report.skipped_anchors) {
            match (anchor.id, anchor.offset) {
                (Some(id), Some(offset)) if !id.is_empty() && offset.is_finite() => {
                    // First element with an id wins, like `querySelector`.
                    anchors.entry(id).or_insert(offset);
                }
                _ => report.skipped_anchors += 1,
            }
        }

        let sections = build_sections(&mut nav, &anchors);
        let header_height = raw
            .header_height
            .as_ref()
            .and_then(Value::as_f64)
            .filter(|h| h.is_finite() && *h > 0.0)
            .unwrap_or(0.0);

        (
            Self {
                cards,
                categories,
                items,
                nav,
                sections,
                header_height,
            },
            report,
        )
    }

    /// Section for an anchor name, if tracked.
    #[must_use]
    pub fn section(&self, anchor: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.identifier == anchor)
    }

    /// Item by back-office id.
    #[must_use]
    pub fn item_by_id(&self, id: u64) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAGE: &str = r##"{
        "cards": [
            { "title": "Red Dress", "labels": ["Model A", null] },
            { "labels": ["orphan"] }
        ],
        "categories": [{ "id": 1, "name": "Silk Collection" }, { "id": 2 }],
        "items": [
            { "id": 7, "name": "Silk Scarf", "status": "SOLD", "anchor": "item-7" },
            { "id": 8, "status": "available" }
        ],
        "nav": [{ "href": "#home" }, { "href": "/contact" }, {}, { "href": "/store/#faq" }],
        "anchors": [
            { "id": "home", "offset": 0 },
            { "id": "faq", "offset": 1200.5 },
            { "id": "faq", "offset": 5 },
            { "id": "broken" }
        ],
        "header_height": 64
    }"##;

    #[test]
    fn extracts_and_skips_incomplete_records() {
        let (page, report) = PageSnapshot::extract(PAGE).expect("valid json");

        assert_eq!(page.cards, vec![ProductCard::new("Red Dress", ["Model A"])]);
        assert_eq!(page.categories.len(), 1);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].status, Some(Availability::Sold));
        assert_eq!(page.nav.len(), 3);
        assert_eq!(
            page.sections,
            vec![Section::new("home", 0.0), Section::new("faq", 1200.5)]
        );
        assert_eq!(page.header_height, 64.0);
        assert_eq!(
            report,
            ExtractReport {
                skipped_cards: 1,
                skipped_categories: 1,
                skipped_items: 1,
                skipped_nav: 1,
                skipped_anchors: 1,
            }
        );
        assert_eq!(page.item_by_id(7).map(|i| i.name.as_str()), Some("Silk Scarf"));
        assert!(page.section("faq").is_some());
    }

    #[test]
    fn mistyped_fields_skip_only_their_record() {
        let (page, report) = PageSnapshot::extract(
            r##"{
                "cards": [{ "title": 5 }, { "title": "Blue Top", "labels": ["Model B"] }],
                "items": [{ "id": "seven", "name": "Silk Scarf" }, { "name": "Wool Hat" }],
                "nav": [{ "href": "#home" }, { "href": ["#faq"] }],
                "anchors": [{ "id": "home", "offset": "12px" }, { "id": "home", "offset": 40 }],
                "header_height": "64px"
            }"##,
        )
        .expect("outline is valid");

        assert_eq!(page.cards, vec![ProductCard::new("Blue Top", ["Model B"])]);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "Wool Hat");
        assert_eq!(page.sections, vec![Section::new("home", 40.0)]);
        assert_eq!(page.header_height, 0.0);
        assert_eq!(
            report,
            ExtractReport {
                skipped_cards: 1,
                skipped_categories: 0,
                skipped_items: 1,
                skipped_nav: 1,
                skipped_anchors: 1,
            }
        );
    }

    #[test]
    fn non_array_list_is_an_error() {
        assert!(matches!(
            PageSnapshot::from_json(r#"{"cards": {"title": "Red Dress"}}"#),
            Err(ExtractError::Json(_))
        ));
    }

    #[test]
    fn empty_document_is_an_empty_page() {
        let page = PageSnapshot::from_json("{}").expect("valid json");
        assert_eq!(page, PageSnapshot::default());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            PageSnapshot::from_json("{\"cards\": 3"),
            Err(ExtractError::Json(_))
        ));
    }
}
