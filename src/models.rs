//! Data models for extracted candidates and the JSON payloads served to clients.
//!
//! - [`RawCandidate`]: an unvalidated headline/link pair straight from markup
//! - [`NewsItem`]: a finalized, categorized, translated headline
//! - [`NewsResponse`] / [`ErrorResponse`]: the two shapes of `GET /news/{id}`
//!
//! Payload fields are camelCase to match what the browser UI reads.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Extraction strategy that produced a candidate, in priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// A configured CSS selector matched.
    Selector(String),
    /// Generic scan over every `<a>` in the document.
    Anchors,
    /// Raw markup split into lines.
    TextLines,
}

impl Method {
    /// Tag reported in responses and logs.
    pub fn tag(&self) -> &str {
        match self {
            Method::Selector(s) => s,
            Method::Anchors => "anchors",
            Method::TextLines => "text-lines",
        }
    }
}

/// A headline/link pair before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCandidate {
    pub title: String,
    /// Possibly relative. `None` only for the text-line tier.
    pub href: Option<String>,
    pub method: Method,
    /// Position of the element within its method's matches.
    pub index: usize,
}

/// A finalized headline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub id: String,
    /// Translated title, or the original when no translation happened.
    pub title: String,
    pub original_title: String,
    /// Always absolute.
    pub link: String,
    pub category: String,
    pub source: String,
    pub language: String,
    pub method: String,
    pub timestamp: String,
}

/// Successful payload of `GET /news/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsResponse {
    pub success: bool,
    pub news: Vec<NewsItem>,
    pub categories: BTreeMap<String, usize>,
    pub fetched_at: String,
    /// Display name of the source.
    pub source: String,
    pub source_id: String,
    pub language: String,
    pub translated: bool,
    /// Distinct extraction methods behind the emitted items.
    pub methods: Vec<String>,
}

/// Failure payload, served with a non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    pub error: String,
    pub timestamp: String,
}

/// Entry of `GET /sources`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSummary {
    pub id: String,
    pub name: String,
    pub country: String,
    pub url: String,
    pub language: String,
    pub description: String,
    pub translated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesResponse {
    pub success: bool,
    pub sources: Vec<SourceSummary>,
}
