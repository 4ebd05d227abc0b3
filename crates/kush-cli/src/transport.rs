#![forbid(unsafe_code)]

//! Blocking HTTP for request effects.
//!
//! One attempt per request and no deadline, like the browser's `fetch`.
//! Failures come back as [`HttpFailure`] so the page model can report them
//! the same way the browser host does.

use std::time::Duration;

use reqwest::blocking::Client;
use url::Url;

use kush_runtime::{HttpFailure, HttpMethod, HttpRequest, HttpResponse};

use crate::error::{CliError, Result};

/// Overall request deadline. The blocking client otherwise gives up after
/// 30 seconds.
const REQUEST_TIMEOUT: Option<Duration> = None;

#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
    base: Option<Url>,
    timeout: Option<Duration>,
}

impl Transport {
    /// `base_url` resolves the page's relative endpoints (`/contact/`,
    /// `/clothes/7/like/`), the way a browser resolves them against the page.
    pub fn new(base_url: Option<&str>) -> Result<Self> {
        let base = base_url
            .map(|raw| {
                Url::parse(raw).map_err(|err| CliError::invalid(format!("base URL {raw:?}: {err}")))
            })
            .transpose()?;
        let client = Client::builder()
            .user_agent(concat!("kush/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base,
            timeout: REQUEST_TIMEOUT,
        })
    }

    /// Deadline applied to each request; `None` waits for the server.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn resolve(&self, target: &str) -> Result<Url> {
        match Url::parse(target) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let Some(base) = &self.base else {
                    return Err(CliError::invalid(format!(
                        "relative endpoint {target:?} needs --base-url"
                    )));
                };
                base.join(target)
                    .map_err(|err| CliError::invalid(format!("endpoint {target:?}: {err}")))
            }
            Err(err) => Err(CliError::invalid(format!("endpoint {target:?}: {err}"))),
        }
    }

    /// Perform `request` once.
    pub fn execute(&self, request: &HttpRequest) -> std::result::Result<HttpResponse, HttpFailure> {
        let url = self
            .resolve(&request.url)
            .map_err(|err| HttpFailure::new(err.to_string()))?;

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(url.clone()),
            HttpMethod::Post => self.client.post(url.clone()),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().map_err(|err| {
            tracing::warn!(target: "kush.http", url = %url, error = %err, "request failed");
            HttpFailure::new(err.to_string())
        })?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|err| HttpFailure::new(err.to_string()))?;
        tracing::debug!(
            target: "kush.http",
            method = request.method.as_str(),
            url = %url,
            status,
            bytes = body.len(),
            "response received"
        );
        Ok(HttpResponse::new(status, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_endpoints_join_the_base() {
        let transport = Transport::new(Some("http://shop.test/store/")).expect("transport");
        assert_eq!(
            transport.resolve("/clothes/7/like/").expect("url").as_str(),
            "http://shop.test/clothes/7/like/"
        );
        assert_eq!(
            transport.resolve("https://other.test/contact/").expect("url").as_str(),
            "https://other.test/contact/"
        );
    }

    #[test]
    fn relative_endpoint_without_base_is_rejected() {
        let transport = Transport::new(None).expect("transport");
        let err = transport.resolve("/contact/").expect_err("needs base");
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("--base-url"));
    }

    #[test]
    fn requests_have_no_deadline() {
        let transport = Transport::new(Some("http://shop.test/")).expect("transport");
        assert_eq!(transport.timeout(), None);
    }

    #[test]
    fn invalid_base_is_rejected() {
        assert!(Transport::new(Some("not a url")).is_err());
    }

    #[test]
    fn unresolvable_request_fails_without_network() {
        let transport = Transport::new(None).expect("transport");
        let failure = transport
            .execute(&HttpRequest::post("/contact/"))
            .expect_err("no base");
        assert!(failure.message.contains("--base-url"));
    }
}
