//! JSON output for harvested summaries and records.
//!
//! Files are pretty-printed with four-space indentation. Hangul and other
//! non-ASCII text is written as-is rather than `\u` escaped.

use crate::utils::ensure_parent_dir;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Serialize `value` as indented JSON.
///
/// # Arguments
///
/// * `value` - Summaries, records, or anything else that implements [`Serialize`]
///
/// # Returns
///
/// The UTF-8 bytes of the document, indented by four spaces, or the
/// serializer's error.
///
/// # Examples
///
/// ```ignore
/// let json = to_pretty_json(&vec!["정치"]).unwrap();
/// assert_eq!(String::from_utf8(json).unwrap(), "[\n    \"정치\"\n]");
/// ```
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;
    Ok(buf)
}

/// Write `value` to `path`, creating parent directories as needed.
///
/// An existing file at `path` is replaced.
///
/// # Arguments
///
/// * `value` - The data to serialize, usually a slice of records or summaries
/// * `path` - Destination file
///
/// # Returns
///
/// `Ok(())` on success, or an error if serialization, directory creation or
/// file writing fails.
///
/// # Examples
///
/// ```ignore
/// write_json(&records, Path::new("out/detailed_articles.json")).await?;
/// ```
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<(), Box<dyn Error>> {
    let json = to_pretty_json(value)?;
    ensure_parent_dir(path).await?;
    fs::write(path, &json).await?;
    info!(bytes = json.len(), "Wrote JSON file");
    Ok(())
}
