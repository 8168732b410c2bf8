//! # Naver News Harvest
//!
//! Collects article summaries from the Naver News section listing and
//! enriches each one with the full article parsed from its detail page.
//!
//! ## Usage
//!
//! ```sh
//! naver_news_harvest --section 정치 --max-pages 20 -o ./out/politics.json
//! ```
//!
//! ## Architecture
//!
//! 1. **Listing**: walk `list.naver` page by page until the page limit, a
//!    failed fetch, an empty page, or the listing repeating itself
//! 2. **Dedup**: collapse summaries sharing a link, first one wins
//! 3. **Detail**: fetch and parse each article page, skipping failures
//! 4. **Output**: write the records (and optionally the summaries) as JSON
//!
//! Ctrl-C stops the harvest at the next fetch or pause; whatever was
//! collected up to that point is still written.

use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod error;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod shutdown;
mod transport;
mod utils;

use clap::Parser;
use cli::Cli;
use outputs::json;
use pipeline::Pipeline;
use shutdown::Shutdown;
use transport::HttpTransport;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("naver_news_harvest starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // --- Shutdown on Ctrl-C ---
    let (trigger, shutdown) = Shutdown::new();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("Interrupt received; finishing with what was collected");
                trigger.trigger();
            }
            Err(e) => error!(error = %e, "Failed to listen for Ctrl-C"),
        }
    });

    let transport = HttpTransport::new(args.request_timeout())?;
    let pipeline = Pipeline::new(&transport, args.pipeline_options(), shutdown);

    // ---- Listing + details ----
    let records = match &args.summaries_output {
        Some(path) => {
            let summaries = pipeline.crawl(args.section.as_deref(), args.max_pages).await;
            if let Err(e) = json::write_json(&summaries, path).await {
                error!(path = %path.display(), error = %e, "Failed to write summaries");
            }
            pipeline.collect_details(&summaries).await
        }
        None => pipeline.run(args.section.as_deref(), args.max_pages).await,
    };

    if let Err(e) = json::write_json(&records, &args.output).await {
        error!(path = %args.output.display(), error = %e, "Failed to write articles");
        return Err(e);
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        articles = records.len(),
        path = %args.output.display(),
        "Execution complete"
    );

    Ok(())
}
