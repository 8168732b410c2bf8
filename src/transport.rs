//! HTTP transport shared by the listing crawler and the article parser.
//!
//! The scrapers only need "GET this URL with these query parameters and hand
//! me the body", so that is all [`Fetch`] exposes. [`HttpTransport`] is the
//! `reqwest` implementation used by the binary; tests substitute an in-memory
//! one that serves canned HTML.

use crate::error::FetchError;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const BROWSER_ACCEPT_LANGUAGE: &str = "ko-KR,ko;q=0.9,en-US;q=0.8,en;q=0.7";

/// Trait for fetching a raw document.
///
/// Implementors return the response body on a 2xx status and a
/// [`FetchError`] for anything else, so callers can tell a failed fetch
/// apart from a page that simply has no matching elements.
pub trait Fetch {
    /// GET `url` with `query` appended as URL-encoded parameters.
    async fn fetch(&self, url: &str, query: &[(&str, String)]) -> Result<String, FetchError>;
}

/// `reqwest`-backed transport with browser-like headers applied once per session.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build a session whose every request carries the fixed headers and `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(BROWSER_ACCEPT_LANGUAGE));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }
}

impl Fetch for HttpTransport {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn fetch(&self, url: &str, query: &[(&str, String)]) -> Result<String, FetchError> {
        let t0 = Instant::now();
        let response = self.client.get(url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(%status, elapsed_ms = t0.elapsed().as_millis() as u64, "Non-success status");
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), elapsed_ms = t0.elapsed().as_millis() as u64, "Fetched document");
        Ok(body)
    }
}
