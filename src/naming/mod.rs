//! Filename conventions for engineering documents
//!
//! This module understands the naming rules used in the document tree:
//! - Revision tags embedded in file names (`_v2`, `-rev3`, ` R01`, ...)
//! - Base names used to group revisions of the same logical document
//! - `YYYYMMDD` date folders

use chrono::NaiveDate;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// Version tag assigned when a name carries no revision marker
pub const DEFAULT_VERSION: &str = "V1";

/// Revision markers in priority order. Matched anywhere in the name.
static VERSION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)[-_ ]v(\d+)",
        r"(?i)[-_ ]ver(\d+)",
        r"(?i)[-_ ]rev(\d+)",
        r"(?i)[-_ ]R(\d+)",
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

/// Trailing revision suffixes stripped from base names, applied in order.
static VERSION_SUFFIXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)[-_ ]v\d+$",
        r"(?i)[-_ ]ver\d+$",
        r"(?i)[-_ ]rev\d+$",
        r"(?i)[-_ ]R\d+$",
        r"(?i)v\d+$",
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

/// Extract the revision tag of a file name as `V<digits>`.
///
/// Patterns are tried in priority order and the first pattern that matches
/// anywhere in the name wins. Names without a marker are `V1`.
pub fn extract_version(name: &str) -> String {
    for pattern in VERSION_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(name) {
            if let Some(digits) = caps.get(1) {
                return format!("V{}", digits.as_str());
            }
        }
    }
    DEFAULT_VERSION.to_string()
}

/// Numeric part of a version tag, `1` when it is not a number.
///
/// Digit runs too long for `u64` saturate so they still rank last.
pub fn version_number(tag: &str) -> u64 {
    let digits = tag.get(1..).unwrap_or("");
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return 1;
    }
    digits.parse().unwrap_or(u64::MAX)
}

/// Strip the extension and any trailing revision suffix from a file name.
///
/// Only suffixes anchored at the end are removed, so this can disagree with
/// [`extract_version`] for names like `plan_v2_final.pdf`.
pub fn extract_base_name(name: &str) -> String {
    let stem = strip_extension(name);
    let mut clean = stem.to_string();
    for pattern in VERSION_SUFFIXES.iter() {
        clean = pattern.replace(&clean, "").into_owned();
    }
    clean.trim().to_string()
}

/// Validate a `YYYYMMDD` folder name and render it as `YYYY-MM-DD`.
///
/// Anything other than eight digits forming a real calendar date yields `None`.
pub fn validate_date_folder(segment: &str) -> Option<String> {
    if segment.len() != 8 || !segment.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let year = segment[0..4].parse().ok()?;
    let month = segment[4..6].parse().ok()?;
    let day = segment[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day).map(|date| date.format("%Y-%m-%d").to_string())
}

/// Uppercased extension of a file name, empty when there is none
pub fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_uppercase())
        .unwrap_or_default()
}

fn strip_extension(name: &str) -> &str {
    // Leading dots (".hidden") are part of the stem
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    }
}
