//! Naver News article page (`n.news.naver.com/mnews/article/...`) parser.
//!
//! [`extract_article`] is a pure mapping from a parsed document to an
//! [`ArticleRecord`]; every field reads through one compiled locator and
//! falls back to empty on a miss. [`ArticleParser`] adds the fetch.
//!
//! # Body normalization
//!
//! The body container's descendants are walked in document order: text
//! nodes contribute their text, every `br` element contributes `\n` and
//! every `img` element contributes [`IMAGE_PLACEHOLDER`], whatever their
//! attributes. The trimmed result is the content.

use crate::error::FetchError;
use crate::models::{ArticleImage, ArticleRecord};
use crate::scrapers::{element_text, first_text, selector};
use crate::transport::Fetch;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Node, Selector};
use tracing::{debug, instrument, warn};

/// Text left in the content wherever an inline image appeared.
pub const IMAGE_PLACEHOLDER: &str = "<이미지>";

const DATESTAMP: &str = "#ct > div.media_end_head.go_trans > div.media_end_head_info.nv_notrans > div.media_end_head_info_journalist > div.media_end_head_journalist_info > div.media_end_head_info_datestamp > div > div";
const JOURNALIST: &str = "#ct > div.media_end_head.go_trans > div.media_end_head_info.nv_notrans > div.media_end_head_info_journalist > div.media_end_head_journalist_info";

/// Compiled locators for the fields of an article page.
struct ArticleLocators {
    title: Selector,
    content: Selector,
    created_at: Selector,
    modified_at: Selector,
    author: Selector,
    media: Selector,
    images: Selector,
}

static LOCATORS: Lazy<ArticleLocators> = Lazy::new(|| ArticleLocators {
    title: selector("#title_area > span"),
    content: selector("#dic_area"),
    created_at: selector(&format!("{DATESTAMP} > div:nth-child(1) > span")),
    modified_at: selector(&format!("{DATESTAMP} > div:nth-child(2) > span")),
    author: selector(&format!("{JOURNALIST} > div.media_end_head_journalist_name_area > a")),
    media: selector(
        "#JOURNALIST_CARD_LIST > div > div > div.media_journalistcard_intro > div > div > div.media_journalistcard_summary_info > div > span",
    ),
    images: selector("#dic_area img"),
});

/// Map an article document to a record. `link` is left empty for the caller.
pub fn extract_article(document: &Html) -> ArticleRecord {
    let root = document.root_element();
    let text = |locator: &Selector| first_text(root, locator).unwrap_or_default();
    let author = root.select(&LOCATORS.author).next();
    let content_area = root.select(&LOCATORS.content).next();

    ArticleRecord {
        title: text(&LOCATORS.title),
        content: content_area.map(normalize_content).unwrap_or_default(),
        created_at: text(&LOCATORS.created_at),
        modified_at: text(&LOCATORS.modified_at),
        author: author.map(element_text).unwrap_or_default(),
        author_link: author
            .and_then(|a| a.value().attr("href"))
            .unwrap_or_default()
            .to_string(),
        media: text(&LOCATORS.media),
        link: String::new(),
        images: extract_images(root),
    }
}

/// Body text with line breaks kept and images marked by the placeholder.
fn normalize_content(content_area: ElementRef<'_>) -> String {
    let mut content = String::new();
    for node in content_area.descendants() {
        match node.value() {
            Node::Text(text) => content.push_str(text),
            Node::Element(element) if element.name() == "br" => content.push('\n'),
            Node::Element(element) if element.name() == "img" => content.push_str(IMAGE_PLACEHOLDER),
            _ => {}
        }
    }
    content.trim().to_string()
}

fn extract_images(root: ElementRef<'_>) -> Vec<ArticleImage> {
    root.select(&LOCATORS.images)
        .filter_map(|img| {
            let attrs = img.value();
            let src = [attrs.attr("data-src"), attrs.attr("src")]
                .into_iter()
                .flatten()
                .find(|src| !src.is_empty())?;
            Some(ArticleImage {
                src: src.to_string(),
                alt: attrs.attr("alt").unwrap_or_default().to_string(),
            })
        })
        .collect()
}

/// Fetches article pages and extracts records from them.
#[derive(Debug)]
pub struct ArticleParser<'a, F> {
    transport: &'a F,
}

impl<'a, F: Fetch> ArticleParser<'a, F> {
    pub fn new(transport: &'a F) -> Self {
        Self { transport }
    }

    /// Fetch and parse the article at `url`.
    ///
    /// The record's `link` is `url` verbatim.
    ///
    /// # Errors
    ///
    /// Returns the transport's [`FetchError`]; no partial record is produced.
    #[instrument(level = "info", skip(self))]
    pub async fn parse(&self, url: &str) -> Result<ArticleRecord, FetchError> {
        let html = self.transport.fetch(url, &[]).await.inspect_err(|e| {
            warn!(error = %e, "Article request failed");
        })?;

        let record = ArticleRecord {
            link: url.to_string(),
            ..extract_article(&Html::parse_document(&html))
        };
        debug!(
            content_chars = record.content.chars().count(),
            images = record.images.len(),
            "Parsed article"
        );
        Ok(record)
    }
}
