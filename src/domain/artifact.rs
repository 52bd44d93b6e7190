//! Artifact naming and versioning helpers.
//!
//! One daily artifact per calendar day of collection, one derived artifact
//! per query invocation.

use chrono::NaiveDate;

pub const DAILY_PREFIX: &str = "top10_holders_";
const CSV_SUFFIX: &str = ".csv";

/// Character budget for the predicate-derived stem of a query artifact name.
pub const MAX_QUERY_STEM: usize = 50;

pub fn daily_artifact_name(date: NaiveDate) -> String {
    format!("{DAILY_PREFIX}{}{CSV_SUFFIX}", date.format("%Y%m%d"))
}

/// Extract the collection date from a daily artifact file name, if it is one.
pub fn parse_daily_date(file_name: &str) -> Option<NaiveDate> {
    let stamp = file_name
        .strip_prefix(DAILY_PREFIX)?
        .strip_suffix(CSV_SUFFIX)?;
    NaiveDate::parse_from_str(stamp, "%Y%m%d").ok()
}

/// Deterministic name for a query-result artifact. The predicate-derived
/// component is sanitized for the filesystem and truncated to a bounded
/// number of characters so long or many predicates cannot produce an
/// invalid name.
pub fn query_artifact_name(predicates: &[String], date: NaiveDate) -> String {
    let stem: String = predicates
        .join("_")
        .chars()
        .map(|c| {
            if c.is_control() || c.is_whitespace() || "/\\:*?\"<>|".contains(c) {
                '_'
            } else {
                c
            }
        })
        .take(MAX_QUERY_STEM)
        .collect();
    format!("query_{stem}_{}{CSV_SUFFIX}", date.format("%Y%m%d"))
}
