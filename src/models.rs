//! Data models for listing summaries and fully parsed articles.
//!
//! - [`ArticleSummary`]: one entry of a section listing page
//! - [`ArticleRecord`]: the full article parsed from its detail page
//! - [`ArticleImage`]: an image found inside the article body
//!
//! Both entities are built once from a single fetch and never mutated
//! afterwards. Missing values are empty strings, not `null`.

use serde::{Deserialize, Serialize};

/// A lightweight reference to an article, as shown on a listing page.
///
/// Equality is field-by-field; the crawler relies on it to detect the
/// listing re-serving its last page. Deduplication uses `link` alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSummary {
    /// Thumbnail URL, if the entry has one.
    pub image_src: Option<String>,
    pub title: String,
    /// Article URL. Empty when the entry had no anchor.
    pub link: String,
    /// Publisher name.
    pub press: String,
    /// Relative or absolute date text as rendered by the listing.
    pub date: String,
    /// Short lede shown under the title.
    pub description: Option<String>,
}

/// An image inside an article body, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleImage {
    pub src: String,
    pub alt: String,
}

/// A fully parsed article.
///
/// Timestamps are kept exactly as the source renders them; callers must not
/// assume a fixed format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub title: String,
    /// Plain-text body. Inline images appear as
    /// [`IMAGE_PLACEHOLDER`](crate::scrapers::article::IMAGE_PLACEHOLDER).
    pub content: String,
    pub created_at: String,
    pub modified_at: String,
    pub author: String,
    /// Link to the reporter's page. Empty when absent.
    pub author_link: String,
    /// Publisher name.
    pub media: String,
    /// The URL the record was fetched from.
    pub link: String,
    pub images: Vec<ArticleImage>,
}
