#![forbid(unsafe_code)]

//! HTTP request/response values exchanged with the host.
//!
//! The page model describes requests; the host performs them (browser
//! `fetch`, or `reqwest` in the CLI) and reports back with the same
//! [`RequestId`]. There is no retry, timeout, or cancellation at this layer.

use serde::{Deserialize, Serialize};

/// Correlates a request effect with its completion event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    #[default]
    Post,
}

impl HttpMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// An outbound request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    #[serde(default)]
    pub headers: Vec<(String, String)>,
    #[serde(default)]
    pub body: Option<String>,
}

impl HttpRequest {
    #[must_use]
    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attach a form-encoded body and its content type.
    #[must_use]
    pub fn form(self, body: String) -> Self {
        let mut req = self.header("Content-Type", FORM_CONTENT_TYPE);
        req.body = Some(body);
        req
    }

    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A completed response, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpResponse {
    pub status: u16,
    #[serde(default)]
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// The request never produced a response (network error, aborted, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("request failed: {message}")]
pub struct HttpFailure {
    pub message: String,
}

impl HttpFailure {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_sets_content_type() {
        let req = HttpRequest::post("/contact/")
            .header("X-CSRFToken", "abc")
            .form("name=Ama".into());
        assert_eq!(req.header_value("content-type"), Some(FORM_CONTENT_TYPE));
        assert_eq!(req.header_value("x-csrftoken"), Some("abc"));
        assert_eq!(req.body.as_deref(), Some("name=Ama"));
    }

    #[test]
    fn success_range() {
        assert!(HttpResponse::new(201, "").is_success());
        assert!(!HttpResponse::new(400, "").is_success());
        assert!(!HttpResponse::new(302, "").is_success());
    }
}
