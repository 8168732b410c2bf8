//! Utility functions for dates, log-friendly strings, and output paths.

use chrono::{Local, NaiveDate};
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Listing date format used by the `date` query parameter.
pub const LISTING_DATE_FORMAT: &str = "%Y%m%d";

/// Today's local date as `YYYYMMDD`.
///
/// This is the listing date used when no `--date` is given.
///
/// # Returns
///
/// An eight-digit string in [`LISTING_DATE_FORMAT`], e.g. `"20251014"`.
pub fn today_yyyymmdd() -> String {
    Local::now().format(LISTING_DATE_FORMAT).to_string()
}

/// Validate a `YYYYMMDD` date string, returning it unchanged.
///
/// Used as a clap value parser for `--date`.
///
/// # Arguments
///
/// * `s` - The raw command-line value
///
/// # Returns
///
/// `Ok(s)` when `s` is exactly eight digits forming a real calendar date,
/// otherwise an `Err` message that clap shows to the user.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(parse_listing_date("20251014").unwrap(), "20251014");
/// assert!(parse_listing_date("2025-10-14").is_err());
/// assert!(parse_listing_date("20250230").is_err());
/// ```
pub fn parse_listing_date(s: &str) -> Result<String, String> {
    if s.len() != 8 || !s.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("expected an 8-digit YYYYMMDD date, got {s:?}"));
    }
    NaiveDate::parse_from_str(s, LISTING_DATE_FORMAT)
        .map(|_| s.to_string())
        .map_err(|e| format!("invalid date {s:?}: {e}"))
}

/// Truncate a string to at most `max` characters for logging.
///
/// Counts characters rather than bytes so Hangul titles are never split
/// inside a code point.
///
/// # Arguments
///
/// * `s` - The string to potentially truncate
/// * `max` - Maximum number of characters to keep
///
/// # Returns
///
/// The original string if it has at most `max` characters, otherwise the
/// first `max` characters with `"…(+N chars)"` appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log("가나다라", 2), "가나…(+2 chars)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} chars)", &s[..cut], s[cut..].chars().count()),
    }
}

/// Create the parent directory of `path` if needed.
///
/// A bare file name has no parent to create and succeeds without touching
/// the filesystem.
///
/// # Arguments
///
/// * `path` - The file about to be written
///
/// # Returns
///
/// `Ok(())` once the parent directory exists, or the I/O error from
/// creating it.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_parent_dir(path: &Path) -> Result<(), Box<dyn Error>> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).await?;
            info!(dir = %parent.display(), "Output directory ready");
            Ok(())
        }
        _ => Ok(()),
    }
}
