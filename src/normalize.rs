//! Link resolution, title bounding, deduplication and capping.

use crate::models::RawCandidate;
use crate::utils::truncate_chars;
use itertools::Itertools;
use url::Url;

/// A candidate whose link is absolute and whose title is display-bounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub title: String,
    pub link: String,
    pub candidate: RawCandidate,
}

/// Resolve `href` against a source's link base.
///
/// - `/path` is joined to the base's origin
/// - `//host/path` takes the base's scheme
/// - anything without a scheme is joined to the base with a single `/`
/// - absolute URLs are returned unchanged
/// - no href at all yields the base itself
pub fn resolve_link(href: Option<&str>, base: &str) -> String {
    let Some(href) = href.map(str::trim).filter(|h| !h.is_empty()) else {
        return base.to_string();
    };
    let parsed_base = Url::parse(base).ok();

    if let Some(rest) = href.strip_prefix("//") {
        let scheme = parsed_base.as_ref().map_or("https", |u| u.scheme());
        return format!("{scheme}://{rest}");
    }
    if href.starts_with('/') {
        let origin = parsed_base
            .map(|u| u.origin().ascii_serialization())
            .unwrap_or_else(|| base.trim_end_matches('/').to_string());
        return format!("{origin}{href}");
    }
    if has_scheme(href) {
        return href.to_string();
    }
    format!("{}/{}", base.trim_end_matches('/'), href)
}

fn has_scheme(href: &str) -> bool {
    match href.split_once(':') {
        Some((scheme, _)) => {
            !scheme.is_empty()
                && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme.chars().all(|c| c.is_ascii_alphanumeric() || "+-.".contains(c))
        }
        None => false,
    }
}

/// Absolutize links, truncate titles to `max_title_chars`, drop repeated
/// titles (first occurrence wins) and keep at most `max_items`.
///
/// Deduplication compares the truncated title, which is what items carry as
/// their original title.
pub fn normalize(
    candidates: Vec<RawCandidate>,
    link_base: &str,
    max_title_chars: usize,
    max_items: usize,
) -> Vec<Normalized> {
    candidates
        .into_iter()
        .map(|candidate| Normalized {
            title: truncate_chars(&candidate.title, max_title_chars),
            link: resolve_link(candidate.href.as_deref(), link_base),
            candidate,
        })
        .unique_by(|n| n.title.clone())
        .take(max_items)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Method;

    fn candidate(title: &str, href: Option<&str>) -> RawCandidate {
        RawCandidate {
            title: title.to_string(),
            href: href.map(str::to_string),
            method: Method::Anchors,
            index: 0,
        }
    }

    #[test]
    fn test_root_relative_joins_origin() {
        assert_eq!(resolve_link(Some("/a/b"), "https://x.test"), "https://x.test/a/b");
        assert_eq!(resolve_link(Some("/a/b"), "https://x.test/news/"), "https://x.test/a/b");
    }

    #[test]
    fn test_schemeless_joins_base() {
        assert_eq!(resolve_link(Some("a/b"), "https://x.test/"), "https://x.test/a/b");
        assert_eq!(resolve_link(Some("a/b"), "https://x.test"), "https://x.test/a/b");
    }

    #[test]
    fn test_absolute_unchanged() {
        assert_eq!(resolve_link(Some("https://y.test/c"), "https://x.test/"), "https://y.test/c");
    }

    #[test]
    fn test_protocol_relative_takes_base_scheme() {
        assert_eq!(resolve_link(Some("//cdn.test/p"), "http://x.test/"), "http://cdn.test/p");
    }

    #[test]
    fn test_missing_href_yields_base() {
        assert_eq!(resolve_link(None, "https://news.ifeng.com/"), "https://news.ifeng.com/");
        assert_eq!(resolve_link(Some("  "), "https://news.ifeng.com/"), "https://news.ifeng.com/");
    }

    #[test]
    fn test_has_scheme() {
        assert!(has_scheme("https://x"));
        assert!(has_scheme("mailto:a@b"));
        assert!(!has_scheme("a/b:c"));
        assert!(!has_scheme("article/123"));
    }

    #[test]
    fn test_normalize_dedups_keeping_first() {
        let out = normalize(
            vec![
                candidate("同じ見出しが二回出てくる", Some("/1")),
                candidate("別の見出しがここにあります", Some("/2")),
                candidate("同じ見出しが二回出てくる", Some("/3")),
            ],
            "https://x.test/",
            200,
            5,
        );
        let links: Vec<&str> = out.iter().map(|n| n.link.as_str()).collect();
        assert_eq!(links, vec!["https://x.test/1", "https://x.test/2"]);
    }

    #[test]
    fn test_normalize_caps() {
        let candidates = (0..8)
            .map(|i| candidate(&format!("とても長い見出しのテキスト{i}"), Some("/p")))
            .collect();
        let out = normalize(candidates, "https://x.test/", 200, 3);
        assert_eq!(out.len(), 3);
        assert_eq!(out[2].title, "とても長い見出しのテキスト2");
    }

    #[test]
    fn test_normalize_dedups_after_truncation() {
        let candidates = (0..8)
            .map(|i| candidate(&format!("とても長い見出しのテキスト{i}"), Some("/p")))
            .collect();
        let out = normalize(candidates, "https://x.test/", 5, 3);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "とても長い");
        assert_eq!(out[0].candidate.title, "とても長い見出しのテキスト0");
    }
}
