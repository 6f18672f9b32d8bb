//! Source descriptors, keyword tables and pipeline policies.
//!
//! The whole configuration is a single YAML document. A default document
//! describing the built-in portals is embedded in the binary; `--config`
//! replaces it with a file on disk.

use crate::error::NewsError;
use scraper::Selector;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, instrument};

/// The configuration shipped with the binary.
pub const DEFAULT_CONFIG_YAML: &str = include_str!("../config/sources.yaml");

/// Top-level configuration document.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Source served by `GET /news` without an id.
    pub default_source: String,
    pub extraction: ExtractionPolicy,
    pub translation: TranslationSettings,
    pub http: HttpSettings,
    pub sources: Vec<SourceDescriptor>,
}

/// One supported news portal.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceDescriptor {
    pub id: String,
    /// Display name, reported as `source` in responses.
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub description: String,
    /// Front page that gets fetched.
    pub url: String,
    /// Base used to absolutize links. Defaults to `url`.
    #[serde(default)]
    pub link_base: Option<String>,
    /// ISO 639-1 code of the portal's language.
    pub language: String,
    #[serde(default = "default_accept_language")]
    pub accept_language: String,
    /// CSS selectors tried in order by the primary extractor.
    pub selectors: Vec<String>,
    /// Boilerplate strings; a title containing any of them is rejected.
    #[serde(default)]
    pub blocklist: Vec<String>,
    /// Boilerplate strings for the raw text-line scan.
    #[serde(default)]
    pub text_blocklist: Vec<String>,
    /// Sentence punctuation a raw text line must contain to count as a headline.
    #[serde(default)]
    pub delimiters: Vec<String>,
    /// Ordered keyword table; first match wins.
    #[serde(default)]
    pub categories: Vec<CategoryRule>,
}

impl SourceDescriptor {
    /// The base links are resolved against.
    pub fn link_base(&self) -> &str {
        self.link_base.as_deref().unwrap_or(&self.url)
    }
}

fn default_accept_language() -> String {
    "en;q=0.8".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CategoryRule {
    pub label: String,
    pub keywords: Vec<String>,
}

/// Title length bounds (exclusive, in characters) and collection cap of one tier.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub struct TierBounds {
    pub min_len: usize,
    pub max_len: usize,
    pub cap: usize,
}

impl TierBounds {
    /// `true` when `len` lies strictly between the bounds.
    pub fn accepts(&self, len: usize) -> bool {
        len > self.min_len && len < self.max_len
    }
}

/// Thresholds shared by every source.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtractionPolicy {
    pub primary: TierBounds,
    pub anchors: TierBounds,
    pub text_lines: TierBounds,
    /// Stop trying further selectors once more candidates than this were found.
    pub good_enough: usize,
    /// A tier yielding fewer candidates than this escalates to the next tier.
    pub min_viable: usize,
    pub max_title_chars: usize,
    /// Number of items returned per response.
    pub max_items: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TranslationSettings {
    pub enabled: bool,
    pub target_language: String,
    pub endpoint: String,
    pub max_concurrent: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpSettings {
    pub user_agent: String,
    pub accept: String,
    pub timeout_secs: u64,
}

impl Config {
    /// Parse and validate a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, NewsError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the file at `path`, or the embedded defaults when `path` is `None`.
    #[instrument(level = "info")]
    pub async fn load(path: Option<&Path>) -> Result<Self, NewsError> {
        let config = match path {
            Some(p) => {
                let yaml = tokio::fs::read_to_string(p).await?;
                Self::from_yaml(&yaml)?
            }
            None => Self::from_yaml(DEFAULT_CONFIG_YAML)?,
        };
        info!(
            sources = config.sources.len(),
            target_language = %config.translation.target_language,
            "Loaded configuration"
        );
        Ok(config)
    }

    pub fn source(&self, id: &str) -> Result<&SourceDescriptor, NewsError> {
        self.sources
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| NewsError::UnknownSource(id.to_string()))
    }

    /// Whether items from `source` go through the translation provider.
    pub fn translates(&self, source: &SourceDescriptor) -> bool {
        self.translation.enabled && source.language != self.translation.target_language
    }

    /// Reject configurations the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), NewsError> {
        if self.sources.is_empty() {
            return Err(NewsError::Config("no sources configured".into()));
        }

        let mut seen = HashSet::new();
        for source in &self.sources {
            if !seen.insert(source.id.as_str()) {
                return Err(NewsError::Config(format!("duplicate source id {:?}", source.id)));
            }
            if url::Url::parse(source.link_base()).is_err() || url::Url::parse(&source.url).is_err() {
                return Err(NewsError::Config(format!("source {:?} has an invalid url", source.id)));
            }
            for selector in &source.selectors {
                Selector::parse(selector).map_err(|e| NewsError::InvalidSelector {
                    selector: selector.clone(),
                    reason: e.to_string(),
                })?;
            }
        }

        if !seen.contains(self.default_source.as_str()) {
            return Err(NewsError::Config(format!(
                "default_source {:?} is not a configured source",
                self.default_source
            )));
        }

        let p = &self.extraction;
        for (tier, bounds) in [("primary", p.primary), ("anchors", p.anchors), ("text_lines", p.text_lines)] {
            if bounds.min_len >= bounds.max_len {
                return Err(NewsError::Config(format!("{tier}: min_len must be below max_len")));
            }
            if bounds.cap == 0 {
                return Err(NewsError::Config(format!("{tier}: cap must be positive")));
            }
        }
        if p.max_items == 0 || p.max_title_chars == 0 {
            return Err(NewsError::Config("max_items and max_title_chars must be positive".into()));
        }
        if self.translation.max_concurrent == 0 {
            return Err(NewsError::Config("translation.max_concurrent must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Config {
        Config::from_yaml(DEFAULT_CONFIG_YAML).unwrap()
    }

    #[test]
    fn test_embedded_config_is_valid() {
        let config = defaults();
        let ids: Vec<&str> = config.sources.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["yahoo", "jtbc", "ifeng"]);
        assert_eq!(config.default_source, "yahoo");
        assert_eq!(config.extraction.max_items, 5);
        assert_eq!(config.extraction.min_viable, 5);
    }

    #[test]
    fn test_category_tables_keep_declaration_order() {
        let config = defaults();
        let yahoo = config.source("yahoo").unwrap();
        let labels: Vec<&str> = yahoo.categories.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels[0], "politics");
        assert_eq!(labels[1], "economics");
        assert!(yahoo.categories[1].keywords.contains(&"株価".to_string()));
    }

    #[test]
    fn test_link_base_defaults_to_url() {
        let config = defaults();
        let jtbc = config.source("jtbc").unwrap();
        assert_eq!(jtbc.link_base(), "https://news.jtbc.co.kr/");
    }

    #[test]
    fn test_unknown_source() {
        let config = defaults();
        assert!(matches!(config.source("nope"), Err(NewsError::UnknownSource(id)) if id == "nope"));
    }

    #[test]
    fn test_translates_only_foreign_sources() {
        let mut config = defaults();
        assert!(!config.translates(config.source("yahoo").unwrap()));
        assert!(config.translates(config.source("ifeng").unwrap()));
        config.translation.enabled = false;
        assert!(!config.translates(config.source("ifeng").unwrap()));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let mut config = defaults();
        let copy = config.sources[0].clone();
        config.sources.push(copy);
        assert!(matches!(config.validate(), Err(NewsError::Config(_))));
    }

    #[test]
    fn test_rejects_bad_selector() {
        let mut config = defaults();
        config.sources[0].selectors.push("div[".to_string());
        assert!(matches!(config.validate(), Err(NewsError::InvalidSelector { .. })));
    }

    #[test]
    fn test_rejects_unknown_default_source() {
        let mut config = defaults();
        config.default_source = "missing".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let mut config = defaults();
        config.extraction.anchors.min_len = 300;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tier_bounds_are_exclusive() {
        let bounds = TierBounds { min_len: 10, max_len: 20, cap: 5 };
        assert!(!bounds.accepts(10));
        assert!(bounds.accepts(11));
        assert!(bounds.accepts(19));
        assert!(!bounds.accepts(20));
    }
}
