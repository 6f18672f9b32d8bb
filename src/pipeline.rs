//! The per-request pipeline: fetch → extract → normalize → translate → assemble.
//!
//! # States
//!
//! ```text
//! fetching → extracting → normalizing → translating → done
//!     └──────────┴─────────────┴─────────────┴──→ failed
//! ```
//!
//! Only fetching is expected to fail in practice (transport errors, non-2xx
//! status). Later stages work on possibly-empty sequences; an empty result
//! is a successful response. Nothing is retried.

use crate::categorize::categorize;
use crate::config::{Config, SourceDescriptor};
use crate::error::NewsError;
use crate::models::{ErrorResponse, Method, NewsItem, NewsResponse};
use crate::normalize::{Normalized, normalize};
use crate::scrapers::{HtmlFetcher, extract};
use crate::translate::{Translate, translate_all};
use crate::utils::{display_timestamp, id_fragment, iso_timestamp};
use chrono::{Local, Utc};
use itertools::Itertools;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    Extracting,
    Normalizing,
    Translating,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Fetching => "fetching",
            Stage::Extracting => "extracting",
            Stage::Normalizing => "normalizing",
            Stage::Translating => "translating",
            Stage::Done => "done",
        })
    }
}

/// A run that ended in the `failed` state.
#[derive(Debug, Error)]
#[error("{stage} failed: {error}")]
pub struct PipelineFailure {
    /// State the run was in when it failed.
    pub stage: Stage,
    #[source]
    pub error: NewsError,
}

/// Everything a request needs, shared across requests.
#[derive(Debug)]
pub struct Pipeline<T> {
    config: Arc<Config>,
    fetcher: HtmlFetcher,
    translator: T,
}

impl<T> Pipeline<T>
where
    T: Translate + Sync,
{
    pub fn new(config: Arc<Config>, fetcher: HtmlFetcher, translator: T) -> Self {
        Self {
            config,
            fetcher,
            translator,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run every stage for `source` and assemble the payload.
    #[instrument(level = "info", skip_all, fields(source = %source.id))]
    pub async fn run(&self, source: &SourceDescriptor) -> Result<NewsResponse, PipelineFailure> {
        let t0 = Instant::now();
        let mut stage = Stage::Fetching;
        let fail = |stage, error| PipelineFailure { stage, error };

        let html = self.fetcher.fetch(source).await.map_err(|e| fail(stage, e))?;

        stage = advance(stage, Stage::Extracting);
        let candidates = extract(&html, source, &self.config.extraction).map_err(|e| fail(stage, e))?;
        drop(html);

        stage = advance(stage, Stage::Normalizing);
        let policy = &self.config.extraction;
        let normalized = normalize(candidates, source.link_base(), policy.max_title_chars, policy.max_items);
        let mut items = build_items(source, normalized);

        stage = advance(stage, Stage::Translating);
        let translated = self.config.translates(source);
        if translated && !items.is_empty() {
            let originals: Vec<String> = items.iter().map(|i| i.original_title.clone()).collect();
            let titles = translate_all(
                &self.translator,
                &originals,
                &source.language,
                &self.config.translation.target_language,
                self.config.translation.max_concurrent,
            )
            .await;
            for (item, title) in items.iter_mut().zip(titles) {
                item.title = title;
            }
        }

        advance(stage, Stage::Done);
        let response = assemble(source, items, translated);
        info!(
            items = response.news.len(),
            methods = ?response.methods,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Pipeline complete"
        );
        Ok(response)
    }
}

fn advance(from: Stage, to: Stage) -> Stage {
    debug!(%from, %to, "Stage transition");
    to
}

/// Categorize normalized candidates into items; titles start untranslated.
fn build_items(source: &SourceDescriptor, normalized: Vec<Normalized>) -> Vec<NewsItem> {
    let timestamp = display_timestamp(Local::now());
    normalized
        .into_iter()
        .map(|n| {
            let method = &n.candidate.method;
            let kind = match method {
                Method::Selector(s) => id_fragment(s),
                Method::Anchors => "fallback".to_string(),
                Method::TextLines => "text".to_string(),
            };
            NewsItem {
                id: format!("{}-{}-{}", source.id, kind, n.candidate.index),
                category: categorize(&n.title, &source.categories).to_string(),
                title: n.title.clone(),
                original_title: n.title,
                link: n.link,
                source: source.id.clone(),
                language: source.language.clone(),
                method: method.tag().to_string(),
                timestamp: timestamp.clone(),
            }
        })
        .collect()
}

/// Package finished items into the success payload.
pub fn assemble(source: &SourceDescriptor, items: Vec<NewsItem>, translated: bool) -> NewsResponse {
    let mut categories = BTreeMap::new();
    for item in &items {
        *categories.entry(item.category.clone()).or_insert(0) += 1;
    }
    let methods = items.iter().map(|i| i.method.clone()).unique().collect();

    NewsResponse {
        success: true,
        news: items,
        categories,
        fetched_at: iso_timestamp(Utc::now()),
        source: source.name.clone(),
        source_id: source.id.clone(),
        language: source.language.clone(),
        translated,
        methods,
    }
}

/// The payload served for the `failed` state.
pub fn failure_response(message: String, error: &NewsError) -> ErrorResponse {
    ErrorResponse {
        success: false,
        message,
        error: error.to_string(),
        timestamp: iso_timestamp(Utc::now()),
    }
}
