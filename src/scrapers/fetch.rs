//! HTML fetcher for source front pages.

use crate::config::{HttpSettings, SourceDescriptor};
use crate::error::NewsError;
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL};
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

/// Downloads source pages while impersonating a desktop browser.
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct HtmlFetcher {
    client: Client,
    accept: String,
}

impl HtmlFetcher {
    pub fn new(settings: &HttpSettings) -> Result<Self, NewsError> {
        let client = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            accept: settings.accept.clone(),
        })
    }

    /// Fetch the front page of `source`.
    ///
    /// # Errors
    ///
    /// - [`NewsError::Transport`] when the request or body read fails (including timeouts)
    /// - [`NewsError::HttpStatus`] when the site answers outside the 2xx range
    #[instrument(level = "info", skip_all, fields(source = %source.id, url = %source.url))]
    pub async fn fetch(&self, source: &SourceDescriptor) -> Result<String, NewsError> {
        let t0 = Instant::now();
        let response = self
            .client
            .get(&source.url)
            .header(ACCEPT, self.accept.as_str())
            .header(ACCEPT_LANGUAGE, source.accept_language.as_str())
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Source answered with an error status");
            return Err(NewsError::HttpStatus {
                status: status.as_u16(),
                url: source.url.clone(),
            });
        }

        let html = response.text().await?;
        info!(
            bytes = html.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched source page"
        );
        Ok(html)
    }
}
