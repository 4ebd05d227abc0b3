#![forbid(unsafe_code)]

//! Kush storefront core.
//!
//! Pure page logic for the storefront: quick card filtering, the
//! category/item search, anchor resolution and the active-section tracker,
//! plus the small pieces of persisted state (theme, like tallies) and the
//! outbound links (WhatsApp orders, contact mail fallback).
//!
//! # Role in the workspace
//! `kush-core` has no notion of events or hosts. `kush-runtime` drives these
//! functions from page events and turns their results into effects;
//! `kush-web` and `kush-cli` are the hosts.
//!
//! Every function here is a pure function of its inputs, so the same query
//! against the same content always yields the same decisions.

pub mod anchor;
pub mod contact;
pub mod dom;
pub mod encode;
pub mod extract;
pub mod filter;
pub mod model;
pub mod order;
pub mod prefs;
pub mod search;
pub mod storage;
pub mod text;
pub mod tracker;

pub use anchor::resolve_anchor;
pub use contact::{ContactError, ContactForm, ContactReply, ValidContact};
pub use extract::{ExtractError, ExtractReport, PageSnapshot};
pub use filter::{Visibility, filter_cards};
pub use model::{Availability, CatalogItem, CatalogRecord, NavEntry, ProductCard, Section};
pub use order::{LinkStyle, OrderDetails, OrderLinkBuilder};
pub use prefs::{LikesLedger, Preferences, Tally, Theme, Vote};
pub use search::{MatchKind, MatchSet, SearchMatch, SearchOutcome, search};
pub use storage::{MemoryStorage, StorageBackend, StorageError, StorageResult};
#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
pub use tracker::{DEFAULT_TRIGGER_MARGIN, NAV_CLICK_OFFSET, active_entries, current_section, scroll_target};
