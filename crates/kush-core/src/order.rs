#![forbid(unsafe_code)]

//! Pre-filled WhatsApp order links.

use serde::{Deserialize, Serialize};

use crate::encode::encode_uri_component;
use crate::model::Availability;

pub const DEFAULT_STORE_NAME: &str = "Kush Women's Fashion Store";
pub const DEFAULT_ORDER_NUMBER: &str = "250785440056";
pub const DEFAULT_SITE_BASE: &str = "https://kushstore.example";

const FALLBACK_PRODUCT: &str = "Selected item";
const FALLBACK_CATEGORY: &str = "General";

/// Shape of the outbound link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkStyle {
    /// `https://api.whatsapp.com/send?phone=<n>&text=<msg>`
    #[default]
    ApiSend,
    /// `https://wa.me/<n>?text=<msg>`
    Short,
}

/// What the shopper clicked "order" on. Every field may be missing from the
/// markup; missing names fall back to neutral wording.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderDetails {
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: Option<Availability>,
    #[serde(default)]
    pub anchor: Option<String>,
}

impl OrderDetails {
    #[must_use]
    pub fn new(product: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            product: Some(product.into()),
            category: Some(category.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: Availability) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn with_anchor(mut self, anchor: impl Into<String>) -> Self {
        self.anchor = Some(anchor.into());
        self
    }
}

/// A composed order: the text shown in the order dialog and the link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLink {
    pub summary: String,
    pub url: String,
}

/// Composes order messages and links for one store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLinkBuilder {
    store_name: String,
    phone: String,
    site_base: String,
    style: LinkStyle,
}

impl Default for OrderLinkBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_STORE_NAME, DEFAULT_ORDER_NUMBER)
    }
}

impl OrderLinkBuilder {
    #[must_use]
    pub fn new(store_name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            store_name: store_name.into(),
            phone: phone.into(),
            site_base: DEFAULT_SITE_BASE.to_string(),
            style: LinkStyle::default(),
        }
    }

    #[must_use]
    pub fn style(mut self, style: LinkStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn site_base(mut self, base: impl Into<String>) -> Self {
        self.site_base = base.into();
        self
    }

    /// Deep link to a product anchor on the landing page.
    #[must_use]
    pub fn deep_link(&self, anchor: &str) -> String {
        format!("{}/#{anchor}", self.site_base.trim_end_matches('/'))
    }

    /// The order message text.
    #[must_use]
    pub fn message(&self, details: &OrderDetails) -> String {
        let product = non_blank(details.product.as_deref()).unwrap_or(FALLBACK_PRODUCT);
        let category = non_blank(details.category.as_deref()).unwrap_or(FALLBACK_CATEGORY);

        let mut message = format!(
            "Hello {}, I'd like to order: {product} (Category: {category}).\n",
            self.store_name
        );
        if let Some(status) = details.status {
            message.push_str(&format!("Status: {}\n", status.label()));
        }
        if let Some(anchor) = non_blank(details.anchor.as_deref()) {
            message.push_str(&format!("Link: {}\n", self.deep_link(anchor)));
        }
        message.push_str("Size: [Please specify]\nQuantity: [Please specify]\n");
        message
    }

    /// Build the summary and link for `details`.
    #[must_use]
    pub fn build(&self, details: &OrderDetails) -> OrderLink {
        let summary = self.message(details);
        let text = encode_uri_component(&summary);
        let url = match self.style {
            LinkStyle::ApiSend => {
                format!("https://api.whatsapp.com/send?phone={}&text={text}", self.phone)
            }
            LinkStyle::Short => format!("https://wa.me/{}?text={text}", self.phone),
        };
        OrderLink { summary, url }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn message_with_all_details() {
        let builder = OrderLinkBuilder::default();
        let details = OrderDetails::new("Silk Scarf", "Accessories")
            .with_status(Availability::Available)
            .with_anchor("item-12");
        assert_eq!(
            builder.message(&details),
            "Hello Kush Women's Fashion Store, I'd like to order: Silk Scarf (Category: Accessories).\n\
             Status: Available\n\
             Link: https://kushstore.example/#item-12\n\
             Size: [Please specify]\n\
             Quantity: [Please specify]\n"
        );
    }

    #[test]
    fn missing_fields_fall_back() {
        let builder = OrderLinkBuilder::default();
        let details = OrderDetails {
            product: Some("  ".into()),
            ..OrderDetails::default()
        };
        assert_eq!(
            builder.message(&details),
            "Hello Kush Women's Fashion Store, I'd like to order: Selected item (Category: General).\n\
             Size: [Please specify]\nQuantity: [Please specify]\n"
        );
    }

    #[test]
    fn api_send_link_is_encoded() {
        let link = OrderLinkBuilder::new("Shop", "123").build(&OrderDetails::new("A", "B"));
        assert_eq!(
            link.url,
            "https://api.whatsapp.com/send?phone=123&text=Hello%20Shop%2C%20I'd%20like%20to%20order%3A%20A%20(Category%3A%20B).%0ASize%3A%20%5BPlease%20specify%5D%0AQuantity%3A%20%5BPlease%20specify%5D%0A"
        );
    }

    #[test]
    fn short_style_uses_wa_me() {
        let link = OrderLinkBuilder::default()
            .style(LinkStyle::Short)
            .build(&OrderDetails::default());
        assert!(link.url.starts_with("https://wa.me/250785440056?text=Hello%20Kush"));
    }

    #[test]
    fn deep_link_ignores_trailing_slash() {
        let builder = OrderLinkBuilder::default().site_base("https://shop.example/store/");
        assert_eq!(builder.deep_link("top"), "https://shop.example/store/#top");
    }
}
