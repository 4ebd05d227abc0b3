#![forbid(unsafe_code)]

//! Element ids and selectors the page markup exposes to the host glue.
//!
//! The core never queries the DOM itself; these names document which markup
//! feeds which typed record, and the host uses them when building a
//! [`crate::extract::PageSnapshot`] or applying effects.

// Search
pub const SEARCH_INPUT_ID: &str = "siteSearch";
pub const SEARCH_BUTTON_ID: &str = "searchBtn";
pub const CARD_SELECTOR: &str = ".collection-card";
pub const CARD_TITLE_SELECTOR: &str = ".collection-title";
pub const CARD_LABEL_SELECTOR: &str = ".swiper-slide strong";
/// Class toggled on a search focus target while highlighted.
pub const HIGHLIGHT_CLASS: &str = "search-highlight";
pub const RESULTS_CONTAINER_CLASS: &str = "search-results";

// Navigation
pub const HEADER_SELECTOR: &str = ".site-header";
pub const NAV_LINK_SELECTOR: &str = ".main-nav .nav-link";
pub const ACTIVE_CLASS: &str = "active";

// Theme
pub const THEME_TOGGLE_ID: &str = "themeToggle";
/// Attribute set on the document element for the dark theme.
pub const THEME_ATTRIBUTE: &str = "data-theme";

// Orders
pub const ORDER_BUTTON_SELECTOR: &str = ".order-wh";
pub const ORDER_MODAL_ID: &str = "orderModal";
pub const ORDER_SUMMARY_ID: &str = "orderSummary";
pub const ORDER_LINK_ID: &str = "wh-btn-2";

// Likes
pub const LIKE_BUTTON_SELECTOR: &str = ".btn-like";
pub const DISLIKE_BUTTON_SELECTOR: &str = ".btn-dislike";
pub const COUNT_SELECTOR: &str = ".count";
pub const PRODUCT_ATTRIBUTE: &str = "data-model";
pub const CATEGORY_ATTRIBUTE: &str = "data-category";

// Contact
pub const CONTACT_FORM_ID: &str = "contactForm";
pub const CONTACT_NAME_ID: &str = "cname";
pub const CONTACT_EMAIL_ID: &str = "cemail";
pub const CONTACT_PHONE_ID: &str = "cphone";
pub const CONTACT_MESSAGE_ID: &str = "cmessage";

/// Every name above, keyed the way the host glue looks them up.
pub const MARKUP: &[(&str, &str)] = &[
    ("searchInput", SEARCH_INPUT_ID),
    ("searchButton", SEARCH_BUTTON_ID),
    ("card", CARD_SELECTOR),
    ("cardTitle", CARD_TITLE_SELECTOR),
    ("cardLabel", CARD_LABEL_SELECTOR),
    ("highlightClass", HIGHLIGHT_CLASS),
    ("resultsClass", RESULTS_CONTAINER_CLASS),
    ("header", HEADER_SELECTOR),
    ("navLink", NAV_LINK_SELECTOR),
    ("activeClass", ACTIVE_CLASS),
    ("themeToggle", THEME_TOGGLE_ID),
    ("themeAttribute", THEME_ATTRIBUTE),
    ("orderButton", ORDER_BUTTON_SELECTOR),
    ("orderModal", ORDER_MODAL_ID),
    ("orderSummary", ORDER_SUMMARY_ID),
    ("orderLink", ORDER_LINK_ID),
    ("likeButton", LIKE_BUTTON_SELECTOR),
    ("dislikeButton", DISLIKE_BUTTON_SELECTOR),
    ("count", COUNT_SELECTOR),
    ("productAttribute", PRODUCT_ATTRIBUTE),
    ("categoryAttribute", CATEGORY_ATTRIBUTE),
    ("contactForm", CONTACT_FORM_ID),
    ("contactName", CONTACT_NAME_ID),
    ("contactEmail", CONTACT_EMAIL_ID),
    ("contactPhone", CONTACT_PHONE_ID),
    ("contactMessage", CONTACT_MESSAGE_ID),
];

/// Look up a markup name by its glue key.
#[must_use]
pub fn markup(key: &str) -> Option<&'static str> {
    MARKUP.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}
