//! Error types for fetching listing and article pages.
//!
//! Extraction never fails (a locator miss degrades to an empty field), so the
//! only error surfaced by the scrapers is a transport failure.

use reqwest::StatusCode;
use thiserror::Error;

/// A failed fetch of a listing or article page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network error, timeout, or a body that could not be read.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{url} returned {status}")]
    Status { url: String, status: StatusCode },

    /// The HTTP session could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),
}
