//! The completion-delegate capability.
//!
//! Both pipeline stages consume the same narrow interface: a prompt in, raw
//! completion text out. The synthesizer and generator differ only in role —
//! which selects the model — never in interface.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::StudioError;

/// Which stage a delegate serves. Selects the model, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelegateRole {
    /// Cheap/fast model for research synthesis.
    Synthesizer,
    /// Higher-quality model for script generation.
    Generator,
}

impl std::fmt::Display for DelegateRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DelegateRole::Synthesizer => write!(f, "synthesizer"),
            DelegateRole::Generator => write!(f, "generator"),
        }
    }
}

/// A completion capability: structured prompt in, raw text out.
///
/// The response is expected to contain a structured payload, possibly
/// wrapped in formatting noise — parsing is the caller's concern (see
/// [`crate::payload`]).
#[async_trait]
pub trait CompletionDelegate: Send + Sync {
    fn role(&self) -> DelegateRole;

    /// Sends one prompt and returns the completion text.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError`] on transport failure or an unusable
    /// completion envelope.
    async fn complete(&self, prompt: &str) -> Result<String, StudioError>;
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: String,
}

/// HTTP implementation over a chat-completions-style endpoint.
pub struct HttpDelegate {
    client: Client,
    api_key: String,
    model: String,
    role: DelegateRole,
    base_url: Url,
    max_tokens: u32,
}

impl HttpDelegate {
    const DEFAULT_BASE_URL: &'static str = "https://api.openrouter.ai/v1/";

    /// Creates a delegate pointed at the production endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        model: &str,
        role: DelegateRole,
        timeout_secs: u64,
    ) -> Result<Self, StudioError> {
        Self::with_base_url(api_key, model, role, timeout_secs, Self::DEFAULT_BASE_URL)
    }

    /// Creates a delegate with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`StudioError::Delegate`] if `base_url` is
    /// not a valid URL base.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        role: DelegateRole,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, StudioError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("tubeforge/0.1 (creator-tooling)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| StudioError::Delegate {
            role,
            message: format!("invalid base URL '{normalised}': {e}"),
        })?;

        // Longer scripts need more tokens; the synthesizer stays cheap.
        let max_tokens = match role {
            DelegateRole::Synthesizer => 4_096,
            DelegateRole::Generator => 8_192,
        };

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            role,
            base_url,
            max_tokens,
        })
    }
}

#[async_trait]
impl CompletionDelegate for HttpDelegate {
    fn role(&self) -> DelegateRole {
        self.role
    }

    async fn complete(&self, prompt: &str) -> Result<String, StudioError> {
        let url = self
            .base_url
            .join("chat/completions")
            .expect("endpoint joins onto a valid base URL");

        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "messages": [{"role": "user", "content": prompt}],
        });

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StudioError::UnexpectedStatus {
                role: self.role,
                status: status.as_u16(),
            });
        }

        let raw = response.text().await?;
        let parsed: CompletionResponse =
            serde_json::from_str(&raw).map_err(|_| StudioError::Delegate {
                role: self.role,
                message: "completion envelope did not parse".to_string(),
            })?;

        let Some(choice) = parsed.choices.into_iter().next() else {
            return Err(StudioError::Delegate {
                role: self.role,
                message: "completion carried no choices".to_string(),
            });
        };

        Ok(choice.message.content)
    }
}

#[cfg(test)]
#[path = "delegate_test.rs"]
mod tests;
