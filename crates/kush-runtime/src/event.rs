#![forbid(unsafe_code)]

//! Page events.
//!
//! Host events (scrolls, clicks, form submits, request completions) and the
//! model's own timer follow-ups share one message type, so a recorded
//! session replays through a single `update` dispatch.

use kush_core::contact::ContactForm;
use kush_core::order::OrderDetails;
use kush_core::prefs::Vote;
use kush_core::PageSnapshot;

use crate::effect::{FocusTarget, NoticeId};
use crate::http::{HttpFailure, HttpResponse, RequestId};

#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// The document finished loading.
    Loaded {
        page: PageSnapshot,
        /// `prefers-color-scheme: dark` at load time.
        prefers_dark: bool,
        csrf_token: Option<String>,
    },
    /// The host re-read the page (content or layout changed).
    ContentChanged { page: PageSnapshot },
    Scrolled { scroll_y: f64 },
    HeaderResized { height: f64 },
    /// Quick card filter (search button or Enter in the search box).
    FilterRequested { query: String },
    /// Category/item search.
    SearchRequested { query: String },
    NavClicked { href: String },
    ThemeToggled,
    Voted { product: String, vote: Vote },
    /// Server-side like button for a catalog item.
    RemoteLikeClicked { product_id: u64 },
    OrderClicked { details: OrderDetails },
    ContactSubmitted { form: ContactForm },
    HttpCompleted {
        id: RequestId,
        result: Result<HttpResponse, HttpFailure>,
    },
    /// The user closed a notice early.
    NoticeDismissed { id: NoticeId },
    HighlightExpired { target: FocusTarget, generation: u64 },
    NoticeExpired { id: NoticeId },
    /// The page is about to unload; flush preferences.
    Unloading,
}

impl PageEvent {
    /// Short stable name, used as a log field.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Loaded { .. } => "loaded",
            Self::ContentChanged { .. } => "content_changed",
            Self::Scrolled { .. } => "scrolled",
            Self::HeaderResized { .. } => "header_resized",
            Self::FilterRequested { .. } => "filter_requested",
            Self::SearchRequested { .. } => "search_requested",
            Self::NavClicked { .. } => "nav_clicked",
            Self::ThemeToggled => "theme_toggled",
            Self::Voted { .. } => "voted",
            Self::RemoteLikeClicked { .. } => "remote_like_clicked",
            Self::OrderClicked { .. } => "order_clicked",
            Self::ContactSubmitted { .. } => "contact_submitted",
            Self::HttpCompleted { .. } => "http_completed",
            Self::NoticeDismissed { .. } => "notice_dismissed",
            Self::HighlightExpired { .. } => "highlight_expired",
            Self::NoticeExpired { .. } => "notice_expired",
            Self::Unloading => "unloading",
        }
    }

    /// Events the model schedules for itself rather than receiving from
    /// the host.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::HighlightExpired { .. } | Self::NoticeExpired { .. })
    }
}
