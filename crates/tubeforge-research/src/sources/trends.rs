//! Trend-search source: neural search with contents.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::ResearchError;
use crate::types::{truncate_to_char_boundary, TrendHit};

const DEFAULT_BASE_URL: &str = "https://api.exa.ai/";
const SNIPPET_MAX_BYTES: usize = 2_000;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    title: Option<String>,
    url: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    score: Option<f64>,
}

/// Client for the trend-search API.
pub struct TrendSearchClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl TrendSearchClient {
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

    /// Runs a neural search and returns hits with truncated content snippets.
    ///
    /// # Errors
    ///
    /// - [`ResearchError::Http`] / [`ResearchError::UnexpectedStatus`] on
    ///   transport failures.
    /// - [`ResearchError::Deserialize`] if the response shape is unexpected.
    pub async fn search(
        &self,
        query: &str,
        num_results: usize,
    ) -> Result<Vec<TrendHit>, ResearchError> {
        let url = self
            .base_url
            .join("search")
            .expect("endpoint joins onto a valid base URL");

        let body = serde_json::json!({
            "query": query,
            "numResults": num_results,
            "useAutoprompt": true,
            "contents": {"text": true},
        });

        let response = self
            .client
            .post(url.clone())
            .header("x-api-key", &self.api_key)
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
        let parsed: SearchResponse =
            serde_json::from_str(&raw).map_err(|e| ResearchError::Deserialize {
                context: format!("trend search(query={query})"),
                source: e,
            })?;

        let hits = parsed
            .results
            .into_iter()
            .map(|r| TrendHit {
                title: r.title.unwrap_or_default(),
                url: r.url,
                snippet: truncate_to_char_boundary(&r.text.unwrap_or_default(), SNIPPET_MAX_BYTES)
                    .to_string(),
                score: r.score.unwrap_or(0.0),
            })
            .collect();

        Ok(hits)
    }
}
