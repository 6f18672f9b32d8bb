//! Degraded extraction tiers, used when configured selectors come up short.

use crate::config::{SourceDescriptor, TierBounds};
use crate::models::{Method, RawCandidate};
use crate::scrapers::extract::{accept_linked, element_headline, is_blocked};
use crate::utils::char_len;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::debug;

static ANCHOR_WITH_HREF: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("static selector"));

/// Scan every anchor in document order with the same filters as the
/// selector tier, under `bounds`.
pub fn scan_anchors(
    document: &Html,
    source: &SourceDescriptor,
    bounds: TierBounds,
) -> Vec<RawCandidate> {
    let candidates: Vec<RawCandidate> = document
        .select(&ANCHOR_WITH_HREF)
        .enumerate()
        .filter_map(|(index, anchor)| {
            let (title, href) = element_headline(anchor);
            accept_linked(&title, href.as_deref(), source, bounds).then(|| RawCandidate {
                title,
                href,
                method: Method::Anchors,
                index,
            })
        })
        .take(bounds.cap)
        .collect();

    debug!(source = %source.id, count = candidates.len(), "Anchor scan done");
    candidates
}

/// Scan raw markup line by line for headline-looking text.
///
/// A line qualifies when it is within `bounds`, holds no angle brackets,
/// contains one of the source's sentence delimiters (any line qualifies when
/// none are configured) and none of its text blocklist entries. No article
/// link survives this tier; candidates carry no href.
pub fn scan_text_lines(
    markup: &str,
    source: &SourceDescriptor,
    bounds: TierBounds,
) -> Vec<RawCandidate> {
    let candidates: Vec<RawCandidate> = markup
        .lines()
        .map(str::trim)
        .filter(|line| {
            bounds.accepts(char_len(line))
                && !line.contains(['<', '>'])
                && (source.delimiters.is_empty()
                    || source.delimiters.iter().any(|d| line.contains(d.as_str())))
                && !is_blocked(line, &source.text_blocklist)
        })
        .take(bounds.cap)
        .enumerate()
        .map(|(index, line)| RawCandidate {
            title: line.to_string(),
            href: None,
            method: Method::TextLines,
            index,
        })
        .collect();

    debug!(source = %source.id, count = candidates.len(), "Text-line scan done");
    candidates
}
