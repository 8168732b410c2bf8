//! Command-line interface definitions.
//!
//! Every option can also be set through an environment variable.

use crate::pipeline::PipelineOptions;
use crate::utils::parse_listing_date;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Harvest Naver News articles for one section and date.
///
/// # Examples
///
/// ```sh
/// # Ten pages of today's politics news
/// naver_news_harvest --section 정치
///
/// # All sections for a given day, also keeping the listing summaries
/// naver_news_harvest --max-pages 1000 --date 20251014 --summaries-output summaries.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Section name (e.g. 정치, 경제, IT/과학) or raw sid1 code; all sections when omitted
    #[arg(short, long, env = "NEWS_SECTION")]
    pub section: Option<String>,

    /// Maximum number of listing pages to crawl
    #[arg(short = 'p', long, env = "NEWS_MAX_PAGES", default_value_t = 10)]
    pub max_pages: u32,

    /// Listing date as YYYYMMDD (defaults to today)
    #[arg(short, long, env = "NEWS_DATE", value_parser = parse_listing_date)]
    pub date: Option<String>,

    /// Pause between listing pages, in seconds
    #[arg(long, env = "NEWS_DELAY", default_value_t = 0.5)]
    pub delay: f64,

    /// Per-request timeout, in seconds
    #[arg(long, env = "NEWS_TIMEOUT", default_value_t = 10)]
    pub timeout: u64,

    /// Maximum article pages fetched at once
    #[arg(short, long, env = "NEWS_CONCURRENCY", default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    pub concurrency: u16,

    /// Where to write the detailed articles
    #[arg(short, long, env = "NEWS_OUTPUT", default_value = "detailed_articles.json")]
    pub output: PathBuf,

    /// Optional file for the deduplicated listing summaries
    #[arg(long, env = "NEWS_SUMMARIES_OUTPUT")]
    pub summaries_output: Option<PathBuf>,
}

impl Cli {
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            target_date: self.date.clone(),
            delay: Duration::from_secs_f64(self.delay.max(0.0)),
            concurrency: usize::from(self.concurrency),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}
