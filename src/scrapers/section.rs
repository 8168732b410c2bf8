//! Multi-page section crawl with loop detection and deduplication.
//!
//! The listing has no "last page" marker: asking for a page past the end
//! re-serves the final real page. The crawler therefore walks pages
//! `1..=max_pages` and stops on the first of:
//!
//! | Condition | Page kept? |
//! |-----------|------------|
//! | fetch failed | no |
//! | page identical to the previous one | no |
//! | page has no entries | nothing to keep |
//! | shutdown requested | no |
//!
//! Results are then deduplicated by link, keeping first occurrences.

use crate::error::FetchError;
use crate::models::ArticleSummary;
use crate::scrapers::listing::ListingFetcher;
use crate::shutdown::Shutdown;
use crate::transport::Fetch;
use crate::utils::today_yyyymmdd;
use std::collections::HashSet;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, instrument, warn};

/// Why a crawl stopped before (or at) `max_pages`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// All requested pages were fetched.
    PageLimit,
    /// A listing fetch failed.
    FetchFailed,
    /// The listing served the previous page again.
    RepeatedPage,
    /// The listing returned no entries.
    EmptyPage,
    /// Shutdown was requested during a fetch or pause.
    Cancelled,
}

/// What to do with one fetched page.
#[derive(Debug, PartialEq)]
enum Transition {
    Continue(Vec<ArticleSummary>),
    Stop(StopReason),
}

fn transition(fetched: Result<Vec<ArticleSummary>, FetchError>, last_page: &[ArticleSummary]) -> Transition {
    match fetched {
        Err(_) => Transition::Stop(StopReason::FetchFailed),
        Ok(page) if page.is_empty() => Transition::Stop(StopReason::EmptyPage),
        Ok(page) if !last_page.is_empty() && page == last_page => Transition::Stop(StopReason::RepeatedPage),
        Ok(page) => Transition::Continue(page),
    }
}

/// Walks the paginated listing of one section.
#[derive(Debug)]
pub struct SectionCrawler<'a, F> {
    pages: ListingFetcher<'a, F>,
    shutdown: Shutdown,
}

impl<'a, F: Fetch> SectionCrawler<'a, F> {
    pub fn new(pages: ListingFetcher<'a, F>, shutdown: Shutdown) -> Self {
        Self { pages, shutdown }
    }

    /// Crawl up to `max_pages` pages of `section` for `target_date`
    /// (today when `None`), pausing `delay` between pages.
    ///
    /// Never fails: a fetch failure or shutdown ends the crawl and the
    /// summaries gathered so far are returned, deduplicated by link.
    #[instrument(level = "info", skip(self))]
    pub async fn crawl(
        &self,
        section: Option<&str>,
        max_pages: u32,
        target_date: Option<&str>,
        delay: Duration,
    ) -> Vec<ArticleSummary> {
        let date = match target_date {
            Some(date) => date.to_string(),
            None => {
                let today = today_yyyymmdd();
                info!(date = %today, "No target date given; using today");
                today
            }
        };

        let mut collected = Vec::new();
        let mut last_page: Vec<ArticleSummary> = Vec::new();
        let mut stop = StopReason::PageLimit;

        for page in 1..=max_pages {
            let fetched = tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => {
                    stop = StopReason::Cancelled;
                    break;
                }
                fetched = self.pages.fetch_page(section, page, Some(date.as_str())) => fetched,
            };

            match transition(fetched, &last_page) {
                Transition::Continue(summaries) => {
                    info!(page, max_pages, count = summaries.len(), "Collected listing page");
                    collected.extend(summaries.iter().cloned());
                    last_page = summaries;
                }
                Transition::Stop(reason) => {
                    stop = reason;
                    break;
                }
            }

            if page < max_pages {
                tokio::select! {
                    biased;
                    _ = self.shutdown.cancelled() => {
                        stop = StopReason::Cancelled;
                        break;
                    }
                    _ = sleep(delay) => {}
                }
            }
        }

        match stop {
            StopReason::PageLimit => {}
            StopReason::RepeatedPage => warn!("Listing repeated the previous page; stopping"),
            reason => warn!(?reason, "Stopping listing crawl"),
        }

        let total = collected.len();
        let unique = dedup_by_link(collected);
        info!(total, unique = unique.len(), ?stop, "Collected unique summaries");
        unique
    }
}

/// Remove later summaries whose link was already seen.
///
/// Summaries without a link can't be told apart, so they are all kept
/// rather than collapsed into the first link-less one.
pub fn dedup_by_link(summaries: Vec<ArticleSummary>) -> Vec<ArticleSummary> {
    let mut seen = HashSet::new();
    summaries
        .into_iter()
        .filter(|summary| summary.link.is_empty() || seen.insert(summary.link.clone()))
        .collect()
}
