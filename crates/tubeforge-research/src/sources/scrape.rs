//! Page-scrape source: URL to markdown.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::ResearchError;
use crate::types::{truncate_to_char_boundary, ScrapedPage};

const DEFAULT_BASE_URL: &str = "https://api.firecrawl.dev/";
const MARKDOWN_MAX_BYTES: usize = 5_000;

#[derive(Debug, Deserialize)]
struct ScrapeResponse {
    #[serde(default)]
    data: Option<ScrapeData>,
}

#[derive(Debug, Deserialize)]
struct ScrapeData {
    #[serde(default)]
    markdown: Option<String>,
    #[serde(default)]
    excerpts: Vec<String>,
}

/// Client for the page-scrape API.
pub struct ScrapeClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl ScrapeClient {
    /// Creates a client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`ResearchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, ResearchError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ResearchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ResearchError::UnexpectedStatus`] if
    /// `base_url` is not a valid URL base.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, ResearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("tubeforge/0.1 (creator-tooling)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|_| ResearchError::UnexpectedStatus {
            status: 0,
            url: normalised,
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Scrapes one page into truncated markdown.
    ///
    /// # Errors
    ///
    /// - [`ResearchError::Http`] / [`ResearchError::UnexpectedStatus`] on
    ///   transport failures.
    /// - [`ResearchError::Api`] when the scrape succeeded but yielded no
    ///   content.
    /// - [`ResearchError::Deserialize`] if the response shape is unexpected.
    pub async fn scrape(&self, target_url: &str) -> Result<ScrapedPage, ResearchError> {
        let url = self
            .base_url
            .join("v1/scrape")
            .expect("endpoint joins onto a valid base URL");

        let body = serde_json::json!({
            "url": target_url,
            "formats": ["markdown"],
        });

        let response = self
            .client
            .post(url.clone())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResearchError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let raw = response.text().await?;
        let parsed: ScrapeResponse =
            serde_json::from_str(&raw).map_err(|e| ResearchError::Deserialize {
                context: format!("scrape(url={target_url})"),
                source: e,
            })?;

        let Some(data) = parsed.data else {
            return Err(ResearchError::Api {
                source_name: "scrape",
                message: format!("no data for {target_url}"),
            });
        };

        let markdown = data.markdown.unwrap_or_default();
        if markdown.is_empty() {
            return Err(ResearchError::Api {
                source_name: "scrape",
                message: format!("empty markdown for {target_url}"),
            });
        }

        Ok(ScrapedPage {
            url: target_url.to_string(),
            markdown: truncate_to_char_boundary(&markdown, MARKDOWN_MAX_BYTES).to_string(),
            excerpts: data.excerpts,
        })
    }
}
