//! Output writers for harvest results.
//!
//! - [`json`]: writes detailed records (and optionally the raw listing
//!   summaries) as JSON arrays

pub mod json;
