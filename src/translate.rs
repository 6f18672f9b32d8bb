//! Headline translation through an external provider.
//!
//! # Architecture
//!
//! - [`Translate`]: the capability the pipeline depends on
//! - [`MyMemoryTranslator`]: the MyMemory HTTP implementation
//! - [`translate_all`]: bounded-concurrency batch that never fails
//!
//! A failed translation is not an error for the pipeline: the title simply
//! stays in its original language.

use crate::error::{NewsError, TranslationError};
use crate::utils::truncate_for_log;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use serde::Deserialize;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Translate text between two ISO 639-1 languages.
pub trait Translate {
    fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> impl Future<Output = Result<String, TranslationError>> + Send;
}

/// Client for the MyMemory `get` endpoint.
///
/// Sends `GET {endpoint}?q=<text>&langpair=<src>|<dst>` and reads
/// `responseData.translatedText`.
#[derive(Debug, Clone)]
pub struct MyMemoryTranslator {
    client: Client,
    endpoint: String,
}

impl MyMemoryTranslator {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, NewsError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    fn request_url(&self, text: &str, source_lang: &str, target_lang: &str) -> String {
        format!(
            "{}?q={}&langpair={}",
            self.endpoint,
            urlencoding::encode(text),
            urlencoding::encode(&format!("{source_lang}|{target_lang}"))
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MyMemoryResponse {
    response_data: Option<MyMemoryData>,
    #[serde(default)]
    response_status: Option<serde_json::Value>,
    #[serde(default)]
    response_details: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MyMemoryData {
    translated_text: Option<String>,
}

/// Pull the translation out of a MyMemory payload.
fn parse_mymemory(body: &str) -> Result<String, TranslationError> {
    let parsed: MyMemoryResponse = serde_json::from_str(body)
        .map_err(|e| TranslationError::Malformed(format!("{e}: {}", truncate_for_log(body, 120))))?;

    // Numeric 200 normally, but quota errors come back as strings like "403".
    let status = match &parsed.response_status {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    };
    if let Some(status) = status.filter(|s| s != "200") {
        let detail = parsed
            .response_details
            .map(|d| d.as_str().map(str::to_string).unwrap_or_else(|| d.to_string()))
            .unwrap_or_default();
        return Err(TranslationError::Rejected { status, detail });
    }

    let text = parsed
        .response_data
        .ok_or_else(|| TranslationError::Malformed("missing responseData".into()))?
        .translated_text
        .ok_or_else(|| TranslationError::Malformed("missing translatedText".into()))?;

    let text = text.trim();
    if text.is_empty() {
        return Err(TranslationError::Empty);
    }
    Ok(text.to_string())
}

impl Translate for MyMemoryTranslator {
    #[instrument(level = "debug", skip_all, fields(%source_lang, %target_lang))]
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, TranslationError> {
        let t0 = Instant::now();
        let response = self
            .client
            .get(self.request_url(text, source_lang, target_lang))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslationError::Status(status.as_u16()));
        }
        let body = response.text().await?;
        let translated = parse_mymemory(&body)?;
        debug!(elapsed_ms = t0.elapsed().as_millis() as u64, "Translated title");
        Ok(translated)
    }
}

/// Translate every title with at most `max_concurrent` calls in flight.
///
/// The output has the same length and order as `titles`; a title whose
/// translation failed is returned unchanged.
#[instrument(level = "info", skip_all, fields(count = titles.len(), %source_lang, %target_lang))]
pub async fn translate_all<T>(
    translator: &T,
    titles: &[String],
    source_lang: &str,
    target_lang: &str,
    max_concurrent: usize,
) -> Vec<String>
where
    T: Translate + Sync,
{
    let t0 = Instant::now();
    let results: Vec<(String, bool)> = stream::iter(titles.iter().cloned().enumerate())
        .map(|(index, title)| async move {
            match translator.translate(&title, source_lang, target_lang).await {
                Ok(translated) => (translated, true),
                Err(e) => {
                    warn!(
                        index,
                        error = %e,
                        title = %truncate_for_log(&title, 50),
                        "Translation failed; keeping original title"
                    );
                    (title, false)
                }
            }
        })
        .buffered(max_concurrent.max(1))
        .collect()
        .await;

    let succeeded = results.iter().filter(|(_, ok)| *ok).count();
    info!(
        succeeded,
        failed = results.len() - succeeded,
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "Translation batch complete"
    );
    results.into_iter().map(|(title, _)| title).collect()
}
