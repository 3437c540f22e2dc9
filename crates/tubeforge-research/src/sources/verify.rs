//! Verification source: fact checks and recent developments via a
//! chat-completions-style research model.

use std::fmt::Write as _;
use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::ResearchError;
use crate::types::FactCheck;

const DEFAULT_BASE_URL: &str = "https://api.perplexity.ai/";
const MODEL: &str = "sonar";

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

/// Client for the verification API.
pub struct VerificationClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl VerificationClient {
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

    /// Verifies a claim set, or runs a general research query when no claims
    /// were extracted.
    ///
    /// # Errors
    ///
    /// - [`ResearchError::Http`] / [`ResearchError::UnexpectedStatus`] on
    ///   transport failures.
    /// - [`ResearchError::Deserialize`] if the response shape is unexpected.
    /// - [`ResearchError::Api`] if the response carries no choices.
    pub async fn verify(&self, topic: &str, claims: &[String]) -> Result<FactCheck, ResearchError> {
        let query = build_query(topic, claims);

        let url = self
            .base_url
            .join("chat/completions")
            .expect("endpoint joins onto a valid base URL");

        let body = serde_json::json!({
            "model": MODEL,
            "messages": [{"role": "user", "content": query}],
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
        let parsed: ChatResponse =
            serde_json::from_str(&raw).map_err(|e| ResearchError::Deserialize {
                context: format!("verification(topic={topic})"),
                source: e,
            })?;

        let Some(choice) = parsed.choices.into_iter().next() else {
            return Err(ResearchError::Api {
                source_name: "verification",
                message: "response carried no choices".to_string(),
            });
        };

        Ok(FactCheck {
            query,
            verification: choice.message.content,
            source: "verification".to_string(),
        })
    }
}

/// Builds the research query: claim verification when claims exist, a
/// general recent-developments query otherwise.
fn build_query(topic: &str, claims: &[String]) -> String {
    if claims.is_empty() {
        return format!(
            "Find recent news, data, and developments about: {topic}\n\n\
             Focus on:\n\
             - New statistics or research findings\n\
             - Recent events or updates\n\
             - Expert opinions\n\
             - Contrarian viewpoints\n\n\
             Provide sources."
        );
    }

    let mut query =
        String::from("Verify these claims and find recent data/news about them:\n");
    for claim in claims {
        let _ = writeln!(query, "- {claim}");
    }
    query.push_str("\nProvide sources and any updates or contradictions.");
    query
}
