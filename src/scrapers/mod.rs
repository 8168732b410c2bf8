//! Naver News scrapers.
//!
//! The harvest runs in two phases, the same way for every section:
//!
//! 1. **Listing**: [`section::SectionCrawler`] walks the paginated section
//!    listing through [`listing::ListingFetcher`] and returns unique
//!    [`ArticleSummary`](crate::models::ArticleSummary) values.
//! 2. **Detail**: [`article::ArticleParser`] fetches each article page and
//!    maps it to an [`ArticleRecord`](crate::models::ArticleRecord).
//!
//! Locators are CSS selectors compiled once. A locator that matches nothing
//! yields an empty field; only transport failures are errors.

use itertools::Itertools;
use scraper::{ElementRef, Selector};

pub mod article;
pub mod listing;
pub mod section;

/// Compile a selector that is part of this crate's locator tables.
pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector {css:?}: {e}"))
}

/// Whitespace-trimmed text content of an element.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().join("").trim().to_string()
}

/// Trimmed text of the first match of `locator` under `scope`.
pub(crate) fn first_text(scope: ElementRef<'_>, locator: &Selector) -> Option<String> {
    scope.select(locator).next().map(element_text)
}
