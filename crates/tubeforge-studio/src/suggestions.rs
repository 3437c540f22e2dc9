//! Channel suggestions from a viewer persona.

use std::sync::Arc;

use crate::context::ProfileContext;
use crate::delegate::CompletionDelegate;
use crate::payload::strip_code_fences;

/// Channels every fallback round can fall back on: popular, diverse, active.
const FALLBACK_CHANNELS: [&str; 10] = [
    "@MrBeast",
    "@Veritasium",
    "@ThePrimeagen",
    "@mkbhd",
    "@LinusTechTips",
    "@3Blue1Brown",
    "@vsauce",
    "@CGPGrey",
    "@TomScottGo",
    "@Fireship",
];

/// Suggests channel handles a target persona would watch.
///
/// Three parse strategies are tried against the completion — a JSON array,
/// an `@handle` scan, then a comma list — before the static fallback set.
pub struct ChannelSuggester {
    delegate: Arc<dyn CompletionDelegate>,
}

impl ChannelSuggester {
    #[must_use]
    pub fn new(delegate: Arc<dyn CompletionDelegate>) -> Self {
        Self { delegate }
    }

    /// Suggests up to `count` handles. Never fails — the static list backs
    /// every failure mode.
    pub async fn suggest(&self, persona: &str, count: usize) -> Vec<String> {
        let prompt = build_suggestion_prompt(persona, count);

        match self.delegate.complete(&prompt).await {
            Ok(raw) => {
                let handles = parse_handles(&raw, count);
                if handles.is_empty() {
                    tracing::warn!("no handles parsed from suggestions — using fallback list");
                    fallback_channels(count)
                } else {
                    tracing::debug!(count = handles.len(), "suggested channels");
                    handles
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "suggestion delegate failed — using fallback list");
                fallback_channels(count)
            }
        }
    }

    /// Persona-free variant used when only a profile exists.
    pub async fn suggest_for_profile(
        &self,
        profile: &ProfileContext,
        count: usize,
    ) -> Vec<String> {
        let persona = format!(
            "A typical viewer of a {} channel aimed at {}",
            profile.niche, profile.target_audience
        );
        self.suggest(&persona, count).await
    }
}

fn build_suggestion_prompt(persona: &str, count: usize) -> String {
    format!(
        "Based on this specific Target Viewer Persona, list exactly {count} real, active, \
         and specific YouTube channels they would watch regularly.\n\n\
         Target Viewer Persona: \"{persona}\"\n\n\
         IMPORTANT REQUIREMENTS:\n\
         1. Return ONLY the YouTube handles (e.g., @Veritasium, @MrBeast)\n\
         2. Each handle must be a real, existing channel\n\
         3. Channels should be highly relevant to this specific persona\n\
         4. Focus on popular, active channels with recent content\n\
         5. Output as a clean JSON array of strings\n\n\
         Example output format:\n\
         [\"@ChannelName1\", \"@ChannelName2\", \"@ChannelName3\"]\n\n\
         Return ONLY the JSON array, no other text."
    )
}

/// Parses handles out of a completion using three strategies in order.
fn parse_handles(raw: &str, count: usize) -> Vec<String> {
    let cleaned = strip_code_fences(raw);

    // Strategy 1: a JSON array of strings.
    if let Ok(parsed) = serde_json::from_str::<Vec<String>>(cleaned) {
        let handles: Vec<String> = parsed
            .into_iter()
            .map(|h| ensure_sigil(h.trim()))
            .filter(|h| h.len() > 1)
            .take(count)
            .collect();
        if !handles.is_empty() {
            return handles;
        }
    }

    // Strategy 2: scan for @handle tokens anywhere in the text.
    let scanned: Vec<String> = scan_handles(cleaned).into_iter().take(count).collect();
    if !scanned.is_empty() {
        return scanned;
    }

    // Strategy 3: a bare comma-separated list.
    if cleaned.contains(',') {
        let handles: Vec<String> = cleaned
            .split(',')
            .map(|part| part.trim_matches(|c: char| c == '"' || c == '[' || c == ']').trim())
            .filter(|part| !part.is_empty() && !part.starts_with('{'))
            .map(ensure_sigil)
            .take(count)
            .collect();
        if !handles.is_empty() {
            return handles;
        }
    }

    Vec::new()
}

fn scan_handles(text: &str) -> Vec<String> {
    let mut handles = Vec::new();
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'@' {
            let start = i;
            i += 1;
            while i < bytes.len()
                && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_' || bytes[i] == b'-')
            {
                i += 1;
            }
            if i > start + 1 {
                handles.push(text[start..i].to_string());
            }
        } else {
            i += 1;
        }
    }
    handles
}

fn ensure_sigil(handle: &str) -> String {
    if handle.starts_with('@') {
        handle.to_string()
    } else {
        format!("@{handle}")
    }
}

fn fallback_channels(count: usize) -> Vec<String> {
    FALLBACK_CHANNELS
        .iter()
        .take(count)
        .map(|h| (*h).to_string())
        .collect()
}

#[cfg(test)]
#[path = "suggestions_test.rs"]
mod tests;
