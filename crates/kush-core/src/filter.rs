#![forbid(unsafe_code)]

//! Quick filter over the rendered collection cards.
//!
//! The filter never reorders or edits cards. It yields exactly one
//! [`Visibility`] per card, in card order; applying them to the page is the
//! host's job.

use serde::{Deserialize, Serialize};

use crate::model::ProductCard;
use crate::text::Query;

/// Whether a card should be displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Visible,
    Hidden,
}

impl Visibility {
    #[must_use]
    pub const fn from_match(matched: bool) -> Self {
        if matched { Self::Visible } else { Self::Hidden }
    }

    #[must_use]
    pub const fn is_visible(self) -> bool {
        matches!(self, Self::Visible)
    }
}

/// Decide the visibility of every card for `query`.
///
/// An empty (or whitespace-only) query resets the listing: every card is
/// visible. Otherwise a card is visible when the normalized query occurs in
/// its title or in its space-joined labels.
#[must_use]
pub fn filter_cards(query: &str, cards: &[ProductCard]) -> Vec<Visibility> {
    let query = Query::new(query);
    if query.is_empty() {
        return vec![Visibility::Visible; cards.len()];
    }
    cards
        .iter()
        .map(|card| Visibility::from_match(card_matches(&query, card)))
        .collect()
}

/// Match test for a single card against an already-normalized query.
#[must_use]
pub fn card_matches(query: &Query, card: &ProductCard) -> bool {
    query.matches(&card.title) || query.matches(&card.joined_labels())
}

/// Number of visible cards in a decision list.
#[must_use]
pub fn visible_count(decisions: &[Visibility]) -> usize {
    decisions.iter().filter(|v| v.is_visible()).count()
}
