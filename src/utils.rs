//! Utility functions for text cleanup, timestamps and file system checks.
//!
//! This module provides helper functions used throughout the application:
//! - Whitespace collapsing and character-safe truncation for scraped titles
//! - Timestamp formatting for payloads
//! - Identifier fragments derived from CSS selectors
//! - File system validation for output directories

use chrono::{DateTime, Local, SecondsFormat, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

use crate::error::NewsError;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));
static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9]").expect("static regex"));

/// Collapse runs of whitespace into single spaces and trim the ends.
///
/// Scraped element text is full of indentation and newlines from the
/// surrounding markup.
pub fn collapse_whitespace(s: &str) -> String {
    WHITESPACE.replace_all(s.trim(), " ").into_owned()
}

/// Length in characters, which is what title bounds are measured in.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Keep at most `max` characters of `s`.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((byte, _)) => s[..byte].to_string(),
        None => s.to_string(),
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and the number
/// of dropped bytes appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    let kept = truncate_chars(s, max);
    if kept.len() == s.len() {
        kept
    } else {
        format!("{}…(+{} bytes)", kept, s.len() - kept.len())
    }
}

/// Strip everything but ASCII letters and digits, for use inside item ids.
///
/// `a[href*="/c/"]` becomes `ahrefc`.
pub fn id_fragment(s: &str) -> String {
    NON_ALNUM.replace_all(s, "").into_owned()
}

/// RFC 3339 UTC timestamp with millisecond precision, e.g. `2025-05-06T05:30:00.000Z`.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Local display timestamp shown next to each item, e.g. `2025年5月6日 14:30`.
pub fn display_timestamp(at: DateTime<Local>) -> String {
    at.format("%Y年%-m月%-d日 %H:%M").to_string()
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then creates and removes a probe file.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), NewsError> {
    fs::create_dir_all(path).await?;
    // Try a small sync write using std fs (simpler error surface)
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!("Output directory is writable");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  株価が\n\t  急騰  "), "株価が 急騰");
        assert_eq!(collapse_whitespace("\n \n"), "");
    }

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("日本語のタイトル", 3), "日本語");
        assert_eq!(truncate_chars("short", 100), "short");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn test_char_len_counts_chars_not_bytes() {
        assert_eq!(char_len("株価"), 2);
        assert_eq!(char_len("abc"), 3);
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_multibyte() {
        let result = truncate_for_log("新闻标题很长", 2);
        assert!(result.starts_with("新闻…"));
        assert!(result.contains("(+12 bytes)"));
    }

    #[test]
    fn test_id_fragment() {
        assert_eq!(id_fragment(r#"a[href*="/c/"]"#), "ahrefc");
        assert_eq!(id_fragment(".news_list li"), "newslistli");
    }

    #[test]
    fn test_iso_timestamp_has_millis_and_z() {
        let at = Utc.with_ymd_and_hms(2025, 5, 6, 5, 30, 0).unwrap();
        assert_eq!(iso_timestamp(at), "2025-05-06T05:30:00.000Z");
    }

    #[test]
    fn test_display_timestamp_format() {
        let at = Local.with_ymd_and_hms(2025, 5, 6, 14, 3, 0).unwrap();
        assert_eq!(display_timestamp(at), "2025年5月6日 14:03");
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates_directory() {
        let dir = std::env::temp_dir().join(format!("headline_relay_probe_{}", std::process::id()));
        let path = dir.to_string_lossy().to_string();
        ensure_writable_dir(&path).await.unwrap();
        assert!(dir.is_dir());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
