//! End-to-end harvest: crawl a section listing, then parse every article.
//!
//! # Concurrency
//!
//! Listing pages are fetched strictly one at a time with a pause in between.
//! Article pages are fetched through
//! [`StreamExt::buffered`](futures::StreamExt::buffered), which keeps at most
//! `concurrency` requests in flight and yields results in input order. With
//! the default of 1 the harvest is fully sequential.

use crate::models::{ArticleRecord, ArticleSummary};
use crate::scrapers::article::ArticleParser;
use crate::scrapers::listing::ListingFetcher;
use crate::scrapers::section::SectionCrawler;
use crate::shutdown::Shutdown;
use crate::transport::Fetch;
use crate::utils::truncate_for_log;
use futures::stream::{self, StreamExt};
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Tunables for a harvest run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    /// Listing date as `YYYYMMDD`; today when `None`.
    pub target_date: Option<String>,
    /// Pause between listing pages.
    pub delay: Duration,
    /// Maximum article pages fetched at once.
    pub concurrency: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            target_date: None,
            delay: Duration::from_millis(500),
            concurrency: 1,
        }
    }
}

/// Drives the listing crawl and the per-article detail fetches.
#[derive(Debug)]
pub struct Pipeline<'a, F> {
    transport: &'a F,
    options: PipelineOptions,
    shutdown: Shutdown,
}

impl<'a, F: Fetch> Pipeline<'a, F> {
    /// Create a pipeline over `transport`.
    ///
    /// # Arguments
    ///
    /// * `transport` - Shared by the listing and detail phases
    /// * `options` - Target date, listing delay and detail concurrency
    /// * `shutdown` - Checked between listing pages and detail fetches
    pub fn new(transport: &'a F, options: PipelineOptions, shutdown: Shutdown) -> Self {
        Self {
            transport,
            options,
            shutdown,
        }
    }

    /// Crawl `section` for up to `max_pages` pages and parse every unique
    /// article found, in listing order. Articles that fail to fetch are skipped.
    ///
    /// # Arguments
    ///
    /// * `section` - Section name (`"정치"`, `"economy"`) or raw code; all sections when `None`
    /// * `max_pages` - Upper bound on listing pages requested
    ///
    /// # Returns
    ///
    /// One record per successfully parsed article. A failed listing crawl or an
    /// early shutdown yields fewer records, never an error.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let pipeline = Pipeline::new(&transport, PipelineOptions::default(), Shutdown::never());
    /// let records = pipeline.run(Some("정치"), 3).await;
    /// ```
    #[instrument(level = "info", skip(self))]
    pub async fn run(&self, section: Option<&str>, max_pages: u32) -> Vec<ArticleRecord> {
        let summaries = self.crawl(section, max_pages).await;
        self.collect_details(&summaries).await
    }

    /// The listing phase alone: unique summaries in first-seen order.
    ///
    /// # Arguments
    ///
    /// * `section` - Section name or raw code; all sections when `None`
    /// * `max_pages` - Upper bound on listing pages requested
    ///
    /// # Returns
    ///
    /// Summaries deduplicated by link, ready for [`Pipeline::collect_details`]
    /// or for writing out on their own.
    pub async fn crawl(&self, section: Option<&str>, max_pages: u32) -> Vec<ArticleSummary> {
        SectionCrawler::new(ListingFetcher::new(self.transport), self.shutdown.clone())
            .crawl(
                section,
                max_pages,
                self.options.target_date.as_deref(),
                self.options.delay,
            )
            .await
    }

    /// The detail phase alone: one record per summary that parsed successfully,
    /// in the order of `summaries`.
    ///
    /// On shutdown, records completed so far are returned.
    ///
    /// # Arguments
    ///
    /// * `summaries` - Listing entries whose `link` is fetched; link-less ones are skipped
    ///
    /// # Returns
    ///
    /// Parsed records, at most one per summary. At most
    /// `options.concurrency` article pages are in flight at once.
    #[instrument(level = "info", skip_all, fields(count = summaries.len()))]
    pub async fn collect_details(&self, summaries: &[ArticleSummary]) -> Vec<ArticleRecord> {
        let parser = ArticleParser::new(self.transport);
        let parser = &parser;
        let total = summaries.len();

        let results: Vec<Option<ArticleRecord>> = stream::iter(summaries.iter().enumerate())
            .map(|(i, summary)| async move {
                let index = i + 1;
                if summary.link.is_empty() {
                    warn!(index, title = %summary.title, "Summary has no link; skipping article");
                    return None;
                }
                match parser.parse(&summary.link).await {
                    Ok(record) => {
                        info!(
                            index,
                            total,
                            title = %truncate_for_log(&record.title, 60),
                            "Parsed article detail"
                        );
                        Some(record)
                    }
                    Err(e) => {
                        warn!(index, total, link = %summary.link, error = %e, "Article fetch failed; skipping");
                        None
                    }
                }
            })
            .buffered(self.options.concurrency.max(1))
            .take_until(self.shutdown.cancelled())
            .collect()
            .await;

        let records: Vec<ArticleRecord> = results.into_iter().flatten().collect();
        info!(
            total,
            parsed = records.len(),
            skipped = total - records.len(),
            cancelled = self.shutdown.is_cancelled(),
            "Completed article details"
        );
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::scrapers::article::fixtures::article_html;
    use crate::scrapers::listing::fixtures::listing_html;
    use crate::scrapers::listing::LISTING_URL;
    use crate::transport::testing::StaticTransport;
    use reqwest::StatusCode;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn article_url(n: u32) -> String {
        format!("https://n.news.naver.com/mnews/article/001/{n:010}")
    }

    fn options() -> PipelineOptions {
        PipelineOptions {
            target_date: Some("20251014".to_string()),
            delay: Duration::ZERO,
            concurrency: 1,
        }
    }

    fn summaries(links: &[String]) -> Vec<ArticleSummary> {
        links
            .iter()
            .map(|link| ArticleSummary {
                link: link.clone(),
                ..Default::default()
            })
            .collect()
    }

    /// Delays early articles longer than later ones and tracks requests in flight.
    struct SlowTransport {
        inner: StaticTransport,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl SlowTransport {
        fn new(inner: StaticTransport) -> Self {
            Self {
                inner,
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }
    }

    impl Fetch for SlowTransport {
        async fn fetch(&self, url: &str, query: &[(&str, String)]) -> Result<String, FetchError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            let n: u64 = url.rsplit('/').next().and_then(|s| s.parse().ok()).unwrap_or(0);
            tokio::time::sleep(Duration::from_millis(60u64.saturating_sub(n * 10))).await;

            let result = self.inner.fetch(url, query).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            result
        }
    }

    #[tokio::test]
    async fn test_run_end_to_end() {
        let page1 = listing_html(&[("one", article_url(1).as_str()), ("two", article_url(2).as_str())]);
        let page2 = listing_html(&[("three", article_url(3).as_str()), ("one again", article_url(1).as_str())]);
        let transport = StaticTransport::new()
            .with_page(LISTING_URL, 1, page1)
            .with_page(LISTING_URL, 2, page2.clone())
            .with_page(LISTING_URL, 3, page2)
            .with_document(&article_url(1), article_html("기사 1", "본문 1"))
            .with_document(&article_url(2), article_html("기사 2", "본문 2"))
            .with_document(&article_url(3), article_html("기사 3", "본문 3"));
        let pipeline = Pipeline::new(&transport, options(), Shutdown::never());

        let records = pipeline.run(Some("정치"), 5).await;

        let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["기사 1", "기사 2", "기사 3"]);
        assert_eq!(records[2].link, article_url(3));
        assert_eq!(records[0].content, "본문 1");
        // three listing pages plus three articles
        assert_eq!(transport.request_count(), 6);
    }

    #[tokio::test]
    async fn test_failed_articles_are_skipped_in_order() {
        let transport = StaticTransport::new()
            .with_document(&article_url(1), article_html("a", "x"))
            .with_document(&article_url(3), article_html("c", "z"));
        let pipeline = Pipeline::new(&transport, options(), Shutdown::never());

        let records = pipeline
            .collect_details(&summaries(&[article_url(1), article_url(2), article_url(3)]))
            .await;

        let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "c"]);
        // the failed article is not retried
        assert_eq!(transport.request_count(), 3);
    }

    #[tokio::test]
    async fn test_linkless_summary_is_skipped_without_fetch() {
        let transport = StaticTransport::new().with_document(&article_url(1), article_html("a", "x"));
        let pipeline = Pipeline::new(&transport, options(), Shutdown::never());

        let records = pipeline
            .collect_details(&summaries(&[String::new(), article_url(1)]))
            .await;
        assert_eq!(records.len(), 1);
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_details_keep_input_order_and_cap() {
        let links: Vec<String> = (1..=5).map(article_url).collect();
        let inner = links.iter().enumerate().fold(StaticTransport::new(), |t, (i, link)| {
            t.with_document(link, article_html(&format!("기사 {}", i + 1), "본문"))
        });
        let transport = SlowTransport::new(inner);
        let pipeline = Pipeline::new(
            &transport,
            PipelineOptions {
                concurrency: 2,
                ..options()
            },
            Shutdown::never(),
        );

        let records = pipeline.collect_details(&summaries(&links)).await;

        let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["기사 1", "기사 2", "기사 3", "기사 4", "기사 5"]);
        assert!(transport.max_in_flight.load(Ordering::SeqCst) <= 2);
        assert!(transport.max_in_flight.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test]
    async fn test_listing_failure_yields_no_details() {
        let transport = StaticTransport::new().with_failed_page(LISTING_URL, 1, StatusCode::FORBIDDEN);
        let pipeline = Pipeline::new(&transport, options(), Shutdown::never());

        assert!(pipeline.run(None, 3).await.is_empty());
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_run_returns_nothing_further() {
        let transport = StaticTransport::new().with_document(&article_url(1), article_html("a", "x"));
        let (trigger, shutdown) = Shutdown::new();
        trigger.trigger();
        let pipeline = Pipeline::new(&transport, options(), shutdown);

        let records = pipeline.collect_details(&summaries(&[article_url(1)])).await;
        assert!(records.is_empty());
    }

    #[test]
    fn test_default_options_are_sequential() {
        let options = PipelineOptions::default();
        assert_eq!(options.concurrency, 1);
        assert_eq!(options.delay, Duration::from_millis(500));
        assert_eq!(options.target_date, None);
    }
}
