#![forbid(unsafe_code)]

//! Case-insensitive substring matching shared by the filter and the search.
//!
//! Queries are trimmed and lower-cased once into a [`Query`]; haystacks are
//! lower-cased per comparison. Lower-casing is full Unicode and does not
//! depend on locale, so `"ÉTÉ"` matches `"été"`.
//!
//! # Example
//! ```
//! use kush_core::text::Query;
//!
//! let q = Query::new("  Silk ");
//! assert!(q.matches("Silk Collection"));
//! assert!(!q.matches("Cotton Collection"));
//! ```

/// A normalized search query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Query {
    folded: String,
}

impl Query {
    /// Trim surrounding whitespace and lower-case.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self {
            folded: fold(raw.trim()),
        }
    }

    /// True when nothing is left after trimming.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.folded.is_empty()
    }

    /// The normalized text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.folded
    }

    /// Substring test against a haystack that has not been folded yet.
    ///
    /// An empty query matches everything.
    #[must_use]
    pub fn matches(&self, haystack: &str) -> bool {
        self.folded.is_empty() || fold(haystack).contains(&self.folded)
    }
}

/// Lower-case `s` without locale tailoring.
#[must_use]
pub fn fold(s: &str) -> String {
    s.to_lowercase()
}
