#![forbid(unsafe_code)]

//! Category/item search.
//!
//! Categories are scanned before items, each in page order; every record
//! whose display name contains the query (case-insensitively) is collected.
//! The first collected match is the focus target, so a matching category
//! always wins focus over a matching item.
//!
//! # Example
//! ```
//! use kush_core::search::{MatchKind, SearchOutcome, search};
//!
//! let outcome = search("silk", &["Silk Collection", "Cotton Collection"], &["Silk Scarf"]);
//! let SearchOutcome::Found { matches, .. } = outcome else { panic!() };
//! assert_eq!(matches.len(), 2);
//! assert_eq!(matches.focus_target().kind, MatchKind::Category);
//! ```

use serde::{Deserialize, Serialize};

use crate::model::DisplayName;
use crate::text::Query;

/// Which list a match came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Category,
    Item,
}

/// One matched record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchMatch {
    pub kind: MatchKind,
    /// Position of the record within its own list.
    pub index: usize,
    pub name: String,
}

/// A non-empty, scan-ordered list of matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchSet {
    matches: Vec<SearchMatch>,
}

impl MatchSet {
    /// Wrap `matches`, or `None` when there are none.
    #[must_use]
    pub fn new(matches: Vec<SearchMatch>) -> Option<Self> {
        if matches.is_empty() {
            None
        } else {
            Some(Self { matches })
        }
    }

    /// The record to scroll to and highlight.
    #[must_use]
    pub fn focus_target(&self) -> &SearchMatch {
        &self.matches[0]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Always false; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &SearchMatch> {
        self.matches.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[SearchMatch] {
        &self.matches
    }
}

/// Result of one search invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// The query was empty after trimming.
    NoQuery,
    Found { query: String, matches: MatchSet },
    NotFound { query: String },
}

impl SearchOutcome {
    /// Number of matches (zero unless `Found`).
    #[must_use]
    pub fn count(&self) -> usize {
        match self {
            Self::Found { matches, .. } => matches.len(),
            Self::NoQuery | Self::NotFound { .. } => 0,
        }
    }

    #[must_use]
    pub fn focus_target(&self) -> Option<&SearchMatch> {
        match self {
            Self::Found { matches, .. } => Some(matches.focus_target()),
            Self::NoQuery | Self::NotFound { .. } => None,
        }
    }

    /// User-facing notice text.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::NoQuery => "Please enter a search term".to_string(),
            Self::Found { query, matches } => {
                if matches.len() == 1 {
                    format!("Found: {}", matches.focus_target().name)
                } else {
                    format!("Found {} results for \"{query}\"", matches.len())
                }
            }
            Self::NotFound { query } => format!("No results found for \"{query}\""),
        }
    }
}

/// Search category and item names for `query`.
///
/// The query carried in `Found`/`NotFound` is the trimmed input with its
/// original casing, as typed by the shopper.
pub fn search<C, I>(query: &str, categories: &[C], items: &[I]) -> SearchOutcome
where
    C: DisplayName,
    I: DisplayName,
{
    let normalized = Query::new(query);
    if normalized.is_empty() {
        return SearchOutcome::NoQuery;
    }

    let categories = collect(&normalized, MatchKind::Category, categories);
    let items = collect(&normalized, MatchKind::Item, items);
    let all: Vec<SearchMatch> = categories.chain(items).collect();

    let query = query.trim().to_string();
    match MatchSet::new(all) {
        Some(matches) => SearchOutcome::Found { query, matches },
        None => SearchOutcome::NotFound { query },
    }
}

fn collect<'a, R: DisplayName>(
    query: &'a Query,
    kind: MatchKind,
    records: &'a [R],
) -> impl Iterator<Item = SearchMatch> + 'a {
    records
        .iter()
        .enumerate()
        .filter(move |(_, record)| query.matches(record.display_name()))
        .map(move |(index, record)| SearchMatch {
            kind,
            index,
            name: record.display_name().to_string(),
        })
}
