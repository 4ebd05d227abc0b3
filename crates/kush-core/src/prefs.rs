#![forbid(unsafe_code)]

//! Shopper preferences persisted in local storage: the colour theme and the
//! per-product like/dislike tallies.
//!
//! [`Preferences`] is the explicit context object for this state. It is
//! loaded once at page init and saved before unload; hosts may also persist
//! after every change. Loading never fails: unreadable or corrupt values are
//! replaced by defaults.
//!
//! Storage may be shared with other pages of the same store, so every write
//! of the likes ledger first folds in whatever is stored.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::storage::{StorageBackend, StorageResult};

pub const THEME_KEY: &str = "kush_theme";
pub const LIKES_KEY: &str = "kush_likes";

/// Colour theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Interpret a stored value. Empty means "nothing stored"; any other
    /// value that is not `"dark"` is light.
    #[must_use]
    pub fn from_stored(raw: &str) -> Option<Self> {
        match raw {
            "" => None,
            "dark" => Some(Self::Dark),
            _ => Some(Self::Light),
        }
    }

    /// Theme implied by the system colour-scheme preference.
    #[must_use]
    pub const fn from_system(prefers_dark: bool) -> Self {
        if prefers_dark { Self::Dark } else { Self::Light }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

/// Like/dislike counts for one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Tally {
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub dislikes: u64,
}

/// A shopper's reaction to a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vote {
    Like,
    Dislike,
}

/// Tallies keyed by product identifier.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LikesLedger {
    tallies: BTreeMap<String, Tally>,
}

impl LikesLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the stored JSON, falling back to an empty ledger.
    #[must_use]
    pub fn from_json_lenient(raw: &str) -> Self {
        match serde_json::from_str(raw) {
            Ok(ledger) => ledger,
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %_err, "discarding corrupt likes ledger");
                Self::default()
            }
        }
    }

    #[must_use]
    pub fn to_json(&self) -> String {
        // A map of plain integers always serializes.
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Count one vote and return the product's new tally.
    pub fn record(&mut self, product: &str, vote: Vote) -> Tally {
        let tally = self.tallies.entry(product.to_string()).or_default();
        match vote {
            Vote::Like => tally.likes = tally.likes.saturating_add(1),
            Vote::Dislike => tally.dislikes = tally.dislikes.saturating_add(1),
        }
        *tally
    }

    /// Raise every tally to at least the counts in `other`.
    pub fn merge_max(&mut self, other: &LikesLedger) {
        for (product, theirs) in &other.tallies {
            let ours = self.tallies.entry(product.clone()).or_default();
            ours.likes = ours.likes.max(theirs.likes);
            ours.dislikes = ours.dislikes.max(theirs.dislikes);
        }
    }

    #[must_use]
    pub fn get(&self, product: &str) -> Tally {
        self.tallies.get(product).copied().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Tally)> {
        self.tallies.iter().map(|(k, v)| (k.as_str(), *v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tallies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tallies.is_empty()
    }
}

/// Storage keys used for each preference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
    pub theme: String,
    pub likes: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            theme: THEME_KEY.to_string(),
            likes: LIKES_KEY.to_string(),
        }
    }
}

/// Theme and like state for one page session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Preferences {
    pub theme: Theme,
    pub likes: LikesLedger,
    keys: StorageKeys,
}

impl Preferences {
    /// Load from `storage`. The theme falls back to the system preference
    /// when nothing usable is stored; the ledger falls back to empty.
    pub fn load<S: StorageBackend + ?Sized>(storage: &S, keys: StorageKeys, prefers_dark: bool) -> Self {
        let stored_theme = read_or_none(storage, &keys.theme);
        let theme = stored_theme
            .as_deref()
            .and_then(Theme::from_stored)
            .unwrap_or(Theme::from_system(prefers_dark));

        let likes = read_or_none(storage, &keys.likes)
            .map(|raw| LikesLedger::from_json_lenient(&raw))
            .unwrap_or_default();

        Self { theme, likes, keys }
    }

    #[must_use]
    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    /// Flip the theme and return the new one.
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    pub fn vote(&mut self, product: &str, vote: Vote) -> Tally {
        self.likes.record(product, vote)
    }

    /// Fold in the tallies currently stored, keeping the higher count of
    /// each product.
    pub fn refresh_likes<S: StorageBackend + ?Sized>(&mut self, storage: &S) {
        if let Some(raw) = read_or_none(storage, &self.keys.likes) {
            self.likes.merge_max(&LikesLedger::from_json_lenient(&raw));
        }
    }

    /// Read, count and write back in one step.
    pub fn vote_persisted<S: StorageBackend + ?Sized>(
        &mut self,
        storage: &mut S,
        product: &str,
        vote: Vote,
    ) -> (Tally, StorageResult<()>) {
        self.refresh_likes(storage);
        let tally = self.vote(product, vote);
        (tally, self.persist_likes(storage))
    }

    pub fn persist_theme<S: StorageBackend + ?Sized>(&self, storage: &mut S) -> StorageResult<()> {
        storage.store(&self.keys.theme, self.theme.as_str())
    }

    pub fn persist_likes<S: StorageBackend + ?Sized>(&self, storage: &mut S) -> StorageResult<()> {
        storage.store(&self.keys.likes, &self.likes.to_json())
    }

    /// Write everything back, keeping votes stored by other pages.
    pub fn save<S: StorageBackend + ?Sized>(&mut self, storage: &mut S) -> StorageResult<()> {
        self.refresh_likes(storage);
        self.persist_theme(storage)?;
        self.persist_likes(storage)
    }
}

fn read_or_none<S: StorageBackend + ?Sized>(storage: &S, key: &str) -> Option<String> {
    match storage.load(key) {
        Ok(value) => value,
        Err(_err) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(key, error = %_err, "storage read failed, using default");
            None
        }
    }
}
