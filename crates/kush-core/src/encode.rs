#![forbid(unsafe_code)]

//! URL component encoding.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters `encodeURIComponent` leaves alone, removed from the escape set.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode `s` exactly like JavaScript's `encodeURIComponent`.
#[must_use]
pub fn encode_uri_component(s: &str) -> String {
    utf8_percent_encode(s, URI_COMPONENT).to_string()
}

/// Encode `pairs` as an `application/x-www-form-urlencoded` body.
#[must_use]
pub fn form_body<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_encode_uri_component() {
        assert_eq!(
            encode_uri_component("I'd like: Model A (Category: Silk).\n"),
            "I'd%20like%3A%20Model%20A%20(Category%3A%20Silk).%0A"
        );
        assert_eq!(encode_uri_component("a&b=c/d?#"), "a%26b%3Dc%2Fd%3F%23");
        assert_eq!(encode_uri_component("été"), "%C3%A9t%C3%A9");
        assert_eq!(encode_uri_component("-_.!~*"), "-_.!~*");
    }

    #[test]
    fn form_body_uses_plus_for_spaces() {
        assert_eq!(
            form_body([("name", "Ama K"), ("message", "hi & bye")]),
            "name=Ama+K&message=hi+%26+bye"
        );
    }
}
