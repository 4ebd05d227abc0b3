#![forbid(unsafe_code)]

//! Typed instructions from the page model to the host.
//!
//! Effects serialize as JSON objects tagged with `effect`, so the browser
//! glue can switch on a single field:
//!
//! ```json
//! { "effect": "set_card_visibility", "cards": ["visible", "hidden"] }
//! ```

use kush_core::order::OrderLink;
use kush_core::prefs::{Tally, Theme};
use kush_core::search::MatchKind;
use kush_core::Visibility;
use serde::{Deserialize, Serialize};

use crate::http::{HttpRequest, RequestId};

/// Identifies a transient notice so a late expiry cannot dismiss a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoticeId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Info,
    Success,
    Warning,
    Error,
}

/// A transient message shown near the triggering control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub id: NoticeId,
    pub kind: NoticeKind,
    pub text: String,
    /// Milliseconds until the model dismisses it.
    pub ttl_ms: u64,
    /// Whether the user may close it early.
    pub dismissable: bool,
}

/// A search match the host should scroll to and highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FocusTarget {
    pub kind: MatchKind,
    /// Position within the category or item list.
    pub index: usize,
}

/// Controls the model disables while a request is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "control", content = "id", rename_all = "snake_case")]
pub enum Control {
    ContactSubmit,
    Like(u64),
}

/// Everything the host may be asked to do.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    ApplyTheme {
        theme: Theme,
    },
    /// One decision per card, in page order.
    SetCardVisibility {
        cards: Vec<Visibility>,
    },
    /// One flag per nav entry, in nav order.
    SetActiveNav {
        active: Vec<bool>,
    },
    ScrollTo {
        top: f64,
    },
    ScrollIntoView {
        target: FocusTarget,
    },
    Highlight {
        target: FocusTarget,
    },
    ClearHighlight {
        target: FocusTarget,
    },
    ShowNotice {
        notice: Notice,
    },
    DismissNotice {
        id: NoticeId,
    },
    ClearSearchInput,
    /// Local like/dislike counters for a product.
    ShowLikeCounts {
        product: String,
        tally: Tally,
    },
    /// Server-side like count.
    ShowRemoteLikes {
        product_id: u64,
        likes: u64,
    },
    OpenOrder {
        link: OrderLink,
    },
    Navigate {
        url: String,
    },
    SetControlEnabled {
        control: Control,
        enabled: bool,
    },
    Http {
        id: RequestId,
        request: HttpRequest,
    },
    ResetContactForm,
}

impl Effect {
    /// Short stable name, used as a log field.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ApplyTheme { .. } => "apply_theme",
            Self::SetCardVisibility { .. } => "set_card_visibility",
            Self::SetActiveNav { .. } => "set_active_nav",
            Self::ScrollTo { .. } => "scroll_to",
            Self::ScrollIntoView { .. } => "scroll_into_view",
            Self::Highlight { .. } => "highlight",
            Self::ClearHighlight { .. } => "clear_highlight",
            Self::ShowNotice { .. } => "show_notice",
            Self::DismissNotice { .. } => "dismiss_notice",
            Self::ClearSearchInput => "clear_search_input",
            Self::ShowLikeCounts { .. } => "show_like_counts",
            Self::ShowRemoteLikes { .. } => "show_remote_likes",
            Self::OpenOrder { .. } => "open_order",
            Self::Navigate { .. } => "navigate",
            Self::SetControlEnabled { .. } => "set_control_enabled",
            Self::Http { .. } => "http",
            Self::ResetContactForm => "reset_contact_form",
        }
    }
}
