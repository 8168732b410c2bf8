//! Naver News section listing (`list.naver`) page fetcher.
//!
//! One call fetches one page of the "latest news" listing for a section and
//! date and turns every list entry into an [`ArticleSummary`]. Entries with
//! missing sub-elements are kept with empty fields.
//!
//! # Query contract
//!
//! ```text
//! https://news.naver.com/main/list.naver?mode=LSD&mid=shm&page=3&date=20251014&sid1=100
//! ```
//!
//! `sid1` is left out to request all sections.

use crate::error::FetchError;
use crate::models::ArticleSummary;
use crate::scrapers::{element_text, first_text, selector};
use crate::transport::Fetch;
use crate::utils::today_yyyymmdd;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument, warn};
use url::Url;

/// The section listing endpoint.
pub const LISTING_URL: &str = "https://news.naver.com/main/list.naver";

/// Section names accepted in place of a raw `sid1` code.
pub const SECTIONS: [(&str, &str); 7] = [
    ("정치", "100"),
    ("경제", "101"),
    ("사회", "102"),
    ("생활/문화", "103"),
    ("세계", "104"),
    ("IT/과학", "105"),
    ("오피니언", "110"),
];

const SECTION_ALIASES: [(&str, &str); 7] = [
    ("politics", "100"),
    ("economy", "101"),
    ("society", "102"),
    ("life", "103"),
    ("world", "104"),
    ("it", "105"),
    ("opinion", "110"),
];

static LISTING_ENDPOINT: Lazy<Url> =
    Lazy::new(|| Url::parse(LISTING_URL).unwrap_or_else(|e| panic!("invalid listing URL: {e}")));

struct ListingLocators {
    item: Selector,
    thumbnail: Selector,
    headline: Selector,
    press: Selector,
    date: Selector,
    lede: Selector,
}

static LOCATORS: Lazy<ListingLocators> = Lazy::new(|| ListingLocators {
    item: selector("#main_content > div.list_body.newsflash_body > ul > li > dl"),
    thumbnail: selector("dt.photo img"),
    headline: selector("dt:not(.photo) a"),
    press: selector("dd span.writing"),
    date: selector("dd span.date"),
    lede: selector("dd span.lede"),
});

/// Map a section name to its `sid1` code. Unknown values are returned as-is
/// so raw codes pass straight through.
pub fn section_code(section: &str) -> &str {
    SECTIONS
        .iter()
        .find(|(name, _)| *name == section)
        .or_else(|| {
            SECTION_ALIASES
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(section))
        })
        .map(|(_, code)| *code)
        .unwrap_or(section)
}

/// Fetches single listing pages through a [`Fetch`] transport.
#[derive(Debug)]
pub struct ListingFetcher<'a, F> {
    transport: &'a F,
    endpoint: Url,
}

impl<'a, F: Fetch> ListingFetcher<'a, F> {
    pub fn new(transport: &'a F) -> Self {
        Self::with_endpoint(transport, LISTING_ENDPOINT.clone())
    }

    pub fn with_endpoint(transport: &'a F, endpoint: Url) -> Self {
        Self {
            transport,
            endpoint,
        }
    }

    /// Fetch page `page` (1-based) of `section` for `target_date` (`YYYYMMDD`,
    /// today when `None`).
    ///
    /// # Errors
    ///
    /// Returns the transport's [`FetchError`]; an empty listing is `Ok(vec![])`.
    #[instrument(level = "debug", skip(self))]
    pub async fn fetch_page(
        &self,
        section: Option<&str>,
        page: u32,
        target_date: Option<&str>,
    ) -> Result<Vec<ArticleSummary>, FetchError> {
        let date = target_date.map_or_else(today_yyyymmdd, str::to_string);
        let query = listing_query(section, page, date);

        let html = match self.transport.fetch(self.endpoint.as_str(), &query).await {
            Ok(html) => html,
            Err(e) => {
                warn!(page, error = %e, "Listing page request failed");
                return Err(e);
            }
        };

        let summaries = parse_listing(&html, &self.endpoint);
        debug!(page, count = summaries.len(), "Parsed listing page");
        Ok(summaries)
    }
}

fn listing_query(section: Option<&str>, page: u32, date: String) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("mode", "LSD".to_string()),
        ("mid", "shm".to_string()),
        ("page", page.to_string()),
        ("date", date),
    ];
    if let Some(section) = section.filter(|s| !s.is_empty()) {
        query.push(("sid1", section_code(section).to_string()));
    }
    query
}

/// Extract every list entry of a listing document, in document order.
pub fn parse_listing(html: &str, base: &Url) -> Vec<ArticleSummary> {
    let document = Html::parse_document(html);
    document
        .select(&LOCATORS.item)
        .map(|item| summarize(item, base))
        .collect()
}

fn summarize(item: ElementRef<'_>, base: &Url) -> ArticleSummary {
    let headline = item.select(&LOCATORS.headline).next();

    ArticleSummary {
        image_src: item
            .select(&LOCATORS.thumbnail)
            .next()
            .and_then(|img| img.value().attr("src"))
            .map(str::to_string),
        title: headline.map(element_text).unwrap_or_default(),
        link: headline
            .and_then(|a| a.value().attr("href"))
            .map(|href| resolve_link(base, href))
            .unwrap_or_default(),
        press: first_text(item, &LOCATORS.press).unwrap_or_default(),
        date: first_text(item, &LOCATORS.date).unwrap_or_default(),
        description: first_text(item, &LOCATORS.lede),
    }
}

fn resolve_link(base: &Url, href: &str) -> String {
    let href = href.trim();
    if href.is_empty() {
        return String::new();
    }
    base.join(href)
        .map(|url| url.to_string())
        .unwrap_or_else(|_| href.to_string())
}


#[cfg(test)]
mod tests {
    use super::fixtures::listing_html;
    use super::*;
    use crate::transport::testing::StaticTransport;
    use reqwest::StatusCode;

    fn base() -> Url {
        Url::parse(LISTING_URL).unwrap()
    }

    #[test]
    fn test_section_code_table() {
        assert_eq!(section_code("정치"), "100");
        assert_eq!(section_code("IT/과학"), "105");
        assert_eq!(section_code("오피니언"), "110");
        assert_eq!(section_code("Economy"), "101");
        assert_eq!(section_code("101"), "101");
        assert_eq!(section_code("999"), "999");
    }

    #[test]
    fn test_parse_listing_extracts_all_fields() {
        let html = listing_html(&[("첫기사", "https://n.news.naver.com/mnews/article/001/0000000001")]);
        let summaries = parse_listing(&html, &base());

        assert_eq!(summaries.len(), 1);
        let summary = &summaries[0];
        assert_eq!(summary.title, "첫기사");
        assert_eq!(summary.link, "https://n.news.naver.com/mnews/article/001/0000000001");
        assert_eq!(summary.press, "연합뉴스");
        assert_eq!(summary.date, "1분전");
        assert_eq!(summary.description.as_deref(), Some("첫기사 lede"));
        assert_eq!(
            summary.image_src.as_deref(),
            Some("https://imgnews.pstatic.net/첫기사.jpg")
        );
    }

    #[test]
    fn test_parse_listing_keeps_items_with_missing_parts() {
        let html = r#"<div id="main_content"><div class="list_body newsflash_body"><ul>
            <li><dl><dd><span class="date">2시간전</span></dd></dl></li>
        </ul></div></div>"#;
        let summaries = parse_listing(html, &base());

        assert_eq!(summaries.len(), 1);
        assert_eq!(
            summaries[0],
            ArticleSummary {
                date: "2시간전".to_string(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_parse_listing_resolves_relative_links() {
        let html = listing_html(&[("rel", "/main/read.naver?aid=1")]);
        let summaries = parse_listing(&html, &base());
        assert_eq!(summaries[0].link, "https://news.naver.com/main/read.naver?aid=1");
    }

    #[test]
    fn test_parse_listing_outside_list_body_is_empty() {
        let html = "<html><body><ul><li><dl><dt><a href=\"x\">t</a></dt></dl></li></ul></body></html>";
        assert!(parse_listing(html, &base()).is_empty());
    }

    #[tokio::test]
    async fn test_fetch_page_sends_listing_contract() {
        let transport = StaticTransport::new().with_page(LISTING_URL, 2, listing_html(&[("a", "https://n.news.naver.com/a")]));
        let fetcher = ListingFetcher::new(&transport);

        let summaries = fetcher
            .fetch_page(Some("경제"), 2, Some("20251014"))
            .await
            .unwrap();
        assert_eq!(summaries.len(), 1);

        let requests = transport.requests();
        assert_eq!(requests[0].0, LISTING_URL);
        let expected: Vec<(String, String)> = [
            ("mode", "LSD"),
            ("mid", "shm"),
            ("page", "2"),
            ("date", "20251014"),
            ("sid1", "101"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        assert_eq!(requests[0].1, expected);
    }

    #[tokio::test]
    async fn test_fetch_page_all_sections_defaults_to_today() {
        let transport = StaticTransport::new().with_page(LISTING_URL, 1, listing_html(&[]));
        let fetcher = ListingFetcher::new(&transport);

        let summaries = fetcher.fetch_page(None, 1, None).await.unwrap();
        assert!(summaries.is_empty());

        let query = &transport.requests()[0].1;
        assert!(query.iter().all(|(k, _)| k != "sid1"));
        let date = &query.iter().find(|(k, _)| k == "date").unwrap().1;
        assert_eq!(date.len(), 8);
        assert!(date.chars().all(|c| c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn test_fetch_page_failure_is_not_empty() {
        let transport = StaticTransport::new().with_failed_page(LISTING_URL, 1, StatusCode::INTERNAL_SERVER_ERROR);
        let fetcher = ListingFetcher::new(&transport);

        let result = fetcher.fetch_page(Some("100"), 1, Some("20251014")).await;
        assert!(matches!(result, Err(FetchError::Status { .. })));
    }
}
