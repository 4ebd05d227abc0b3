#![forbid(unsafe_code)]

//! JSON parser for host-encoded page events.
//!
//! The browser glue encodes each DOM event as a flat JSON object with a
//! `kind` tag and hands it to [`parse_page_event`]:
//!
//! ```json
//! { "kind": "scroll", "scroll_y": 812.5 }
//! { "kind": "search", "query": "silk" }
//! { "kind": "http_response", "id": 3, "status": 200, "body": "{\"likes\":4}" }
//! ```
//!
//! Kinds without a page meaning return `Ok(None)`. Timer follow-ups
//! (highlight/notice expiry) are scheduled by the model itself and cannot be
//! injected by the host.

use kush_core::contact::ContactForm;
use kush_core::order::OrderDetails;
use kush_core::prefs::Vote;
use kush_core::{ExtractError, PageSnapshot};
use kush_runtime::{HttpFailure, HttpResponse, NoticeId, PageEvent, RequestId};
use serde::Deserialize;

/// Errors from parsing encoded page events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputParseError {
    /// Malformed JSON.
    Json(String),
    /// Missing required field.
    MissingField(&'static str),
    /// Vote other than `like`/`dislike`.
    UnknownVote(String),
    /// The embedded page snapshot could not be read.
    Page(ExtractError),
}

impl core::fmt::Display for InputParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "JSON parse error: {msg}"),
            Self::MissingField(field) => write!(f, "missing required field: {field}"),
            Self::UnknownVote(vote) => write!(f, "unknown vote: {vote}"),
            Self::Page(err) => write!(f, "page snapshot: {err}"),
        }
    }
}

impl std::error::Error for InputParseError {}

/// Internal deserialization target for every event kind.
#[derive(Debug, Deserialize)]
struct RawInput {
    kind: String,
    #[serde(default)]
    page: Option<serde_json::Value>,
    #[serde(default)]
    prefers_dark: Option<bool>,
    #[serde(default)]
    csrf_token: Option<String>,
    #[serde(default)]
    scroll_y: Option<f64>,
    #[serde(default)]
    height: Option<f64>,
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    href: Option<String>,
    #[serde(default)]
    product: Option<String>,
    #[serde(default)]
    vote: Option<String>,
    #[serde(default)]
    product_id: Option<u64>,
    #[serde(default)]
    details: Option<OrderDetails>,
    #[serde(default)]
    form: Option<ContactForm>,
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    status: Option<u16>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Parse one JSON-encoded page event.
///
/// Returns `Err` for malformed JSON or missing required fields.
pub fn parse_page_event(json: &str) -> Result<Option<PageEvent>, InputParseError> {
    let raw: RawInput =
        serde_json::from_str(json).map_err(|e| InputParseError::Json(e.to_string()))?;

    let event = match raw.kind.as_str() {
        "loaded" => PageEvent::Loaded {
            page: parse_page(raw.page)?,
            prefers_dark: raw.prefers_dark.unwrap_or(false),
            csrf_token: raw.csrf_token,
        },
        "content_changed" => PageEvent::ContentChanged {
            page: parse_page(raw.page)?,
        },
        "scroll" => PageEvent::Scrolled {
            scroll_y: require(raw.scroll_y, "scroll_y")?,
        },
        "header_resize" => PageEvent::HeaderResized {
            height: require(raw.height, "height")?,
        },
        // An empty box is a reset, so a missing query means the same.
        "filter" => PageEvent::FilterRequested {
            query: raw.query.unwrap_or_default(),
        },
        "search" => PageEvent::SearchRequested {
            query: raw.query.unwrap_or_default(),
        },
        "nav_click" => PageEvent::NavClicked {
            href: require(raw.href, "href")?,
        },
        "theme_toggle" => PageEvent::ThemeToggled,
        "vote" => PageEvent::Voted {
            product: require(raw.product, "product")?,
            vote: parse_vote(&require(raw.vote, "vote")?)?,
        },
        "remote_like" => PageEvent::RemoteLikeClicked {
            product_id: require(raw.product_id, "product_id")?,
        },
        "order" => PageEvent::OrderClicked {
            details: raw.details.unwrap_or_default(),
        },
        "contact_submit" => PageEvent::ContactSubmitted {
            form: require(raw.form, "form")?,
        },
        "http_response" => PageEvent::HttpCompleted {
            id: RequestId(require(raw.id, "id")?),
            result: Ok(HttpResponse::new(
                require(raw.status, "status")?,
                raw.body.unwrap_or_default(),
            )),
        },
        "http_error" => PageEvent::HttpCompleted {
            id: RequestId(require(raw.id, "id")?),
            result: Err(HttpFailure::new(
                raw.error.unwrap_or_else(|| "network error".to_string()),
            )),
        },
        "notice_dismissed" => PageEvent::NoticeDismissed {
            id: NoticeId(require(raw.id, "id")?),
        },
        "unload" => PageEvent::Unloading,
        _ => return Ok(None),
    };
    Ok(Some(event))
}

fn require<T>(value: Option<T>, field: &'static str) -> Result<T, InputParseError> {
    value.ok_or(InputParseError::MissingField(field))
}

fn parse_page(page: Option<serde_json::Value>) -> Result<PageSnapshot, InputParseError> {
    let page = require(page, "page")?;
    PageSnapshot::from_json(&page.to_string()).map_err(InputParseError::Page)
}

fn parse_vote(vote: &str) -> Result<Vote, InputParseError> {
    match vote {
        "like" => Ok(Vote::Like),
        "dislike" => Ok(Vote::Dislike),
        other => Err(InputParseError::UnknownVote(other.to_string())),
    }
}
