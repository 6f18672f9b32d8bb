//! Selector-based headline extraction and tier escalation.
//!
//! [`extract`] is the entry point: it parses the markup once, runs the
//! configured selectors and escalates to the [`fallback`](super::fallback)
//! tiers when too few headlines come out.

use crate::config::{ExtractionPolicy, SourceDescriptor, TierBounds};
use crate::error::NewsError;
use crate::models::{Method, RawCandidate};
use crate::scrapers::fallback::{scan_anchors, scan_text_lines};
use crate::utils::{char_len, collapse_whitespace};
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument};

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").expect("static selector"));
static HEADING: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1, h2, h3, h4").expect("static selector"));

/// Extract raw candidates from `markup`, escalating through the tiers.
///
/// Candidate order is tier order, then selector order, then document order.
/// The parsed document never outlives this call.
#[instrument(level = "info", skip_all, fields(source = %source.id, bytes = markup.len()))]
pub fn extract(
    markup: &str,
    source: &SourceDescriptor,
    policy: &ExtractionPolicy,
) -> Result<Vec<RawCandidate>, NewsError> {
    let document = Html::parse_document(markup);

    let primary = extract_primary(&document, source, policy)?;
    let primary_count = distinct_titles(&primary);
    if primary_count >= policy.min_viable {
        info!(count = primary.len(), "Configured selectors produced enough headlines");
        return Ok(primary);
    }

    info!(count = primary_count, "Configured selectors came up short; scanning anchors");
    let anchors = scan_anchors(&document, source, policy.anchors);
    let anchor_count = distinct_titles(&anchors);
    if anchor_count >= policy.min_viable {
        return Ok(anchors);
    }

    info!(count = anchor_count, "Anchor scan came up short; scanning text lines");
    let lines = scan_text_lines(markup, source, policy.text_lines);
    if distinct_titles(&lines) >= policy.min_viable {
        return Ok(lines);
    }

    // Nothing viable: keep the richest tier, earlier tiers win ties.
    let best = [primary, anchors, lines]
        .into_iter()
        .fold(Vec::new(), |best, tier| {
            if distinct_titles(&tier) > distinct_titles(&best) { tier } else { best }
        });
    info!(count = best.len(), "No tier reached viability");
    Ok(best)
}

/// Run the source's selectors in order over `document`.
///
/// Collection stops at `policy.primary.cap` candidates, and no further
/// selector is tried once more than `policy.good_enough` were collected.
pub fn extract_primary(
    document: &Html,
    source: &SourceDescriptor,
    policy: &ExtractionPolicy,
) -> Result<Vec<RawCandidate>, NewsError> {
    let bounds = policy.primary;
    let mut candidates = Vec::new();

    for raw_selector in &source.selectors {
        if candidates.len() > policy.good_enough || candidates.len() >= bounds.cap {
            break;
        }
        let selector = Selector::parse(raw_selector).map_err(|e| NewsError::InvalidSelector {
            selector: raw_selector.clone(),
            reason: e.to_string(),
        })?;

        let before = candidates.len();
        for (index, element) in document.select(&selector).enumerate() {
            if candidates.len() >= bounds.cap {
                break;
            }
            let (title, href) = element_headline(element);
            if accept_linked(&title, href.as_deref(), source, bounds) {
                candidates.push(RawCandidate {
                    title,
                    href,
                    method: Method::Selector(raw_selector.clone()),
                    index,
                });
            }
        }
        debug!(selector = %raw_selector, accepted = candidates.len() - before, "Selector done");
    }

    Ok(candidates)
}

/// Title and raw href of a matched element.
///
/// The link is the element itself when it is an anchor, otherwise its first
/// anchor descendant. The title is the link text, else the first heading
/// descendant's text, else the element's whole text.
pub(crate) fn element_headline(element: ElementRef<'_>) -> (String, Option<String>) {
    let link = if element.value().name() == "a" {
        Some(element)
    } else {
        element.select(&ANCHOR).next()
    };
    let href = link
        .and_then(|a| a.value().attr("href"))
        .map(|h| h.trim().to_string());

    let mut title = link.map(text_of).unwrap_or_default();
    if title.is_empty() {
        title = element.select(&HEADING).next().map(text_of).unwrap_or_default();
    }
    if title.is_empty() {
        title = text_of(element);
    }
    (title, href)
}

fn text_of(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// Shared filter of the selector and anchor tiers.
pub(crate) fn accept_linked(
    title: &str,
    href: Option<&str>,
    source: &SourceDescriptor,
    bounds: TierBounds,
) -> bool {
    bounds.accepts(char_len(title))
        && href.is_some_and(is_followable)
        && !is_blocked(title, &source.blocklist)
}

/// `false` for empty, `javascript:` and fragment-only links.
pub fn is_followable(href: &str) -> bool {
    let href = href.trim();
    !href.is_empty()
        && !href.starts_with('#')
        && !href.get(..11).is_some_and(|p| p.eq_ignore_ascii_case("javascript:"))
}

pub(crate) fn is_blocked(text: &str, blocklist: &[String]) -> bool {
    blocklist.iter().any(|b| text.contains(b.as_str()))
}

fn distinct_titles(candidates: &[RawCandidate]) -> usize {
    candidates.iter().unique_by(|c| c.title.clone()).count()
}
