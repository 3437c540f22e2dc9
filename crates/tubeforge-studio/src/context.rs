//! Shared prompt-context types and the stage-origin marker.

use serde::{Deserialize, Serialize};

/// Where a stage's output came from: the delegate, or the built-in fallback
/// after a delegate or parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageOrigin {
    Delegate,
    Fallback,
}

impl StageOrigin {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            StageOrigin::Delegate => "delegate",
            StageOrigin::Fallback => "fallback",
        }
    }

    #[must_use]
    pub fn is_fallback(self) -> bool {
        matches!(self, StageOrigin::Fallback)
    }
}

/// The primary document and its video metadata, as prompt context.
#[derive(Debug, Clone)]
pub struct VideoContext {
    pub video_id: String,
    pub title: String,
    pub view_count: Option<i64>,
    pub transcript: String,
}

impl VideoContext {
    /// The first `max_words` words of the transcript, for prompt budgets.
    #[must_use]
    pub fn transcript_summary(&self, max_words: usize) -> String {
        let words: Vec<&str> = self.transcript.split_whitespace().collect();
        if words.len() <= max_words {
            self.transcript.clone()
        } else {
            words[..max_words].join(" ")
        }
    }
}

/// Creator-profile fields used only as prompt context.
#[derive(Debug, Clone, Default)]
pub struct ProfileContext {
    pub creator_name: String,
    pub niche: String,
    pub tone: String,
    pub target_audience: String,
    pub expertise: Vec<String>,
    pub bio: String,
}

impl ProfileContext {
    pub(crate) fn expertise_line(&self) -> String {
        if self.expertise.is_empty() {
            "General knowledge".to_string()
        } else {
            self.expertise.join(", ")
        }
    }
}
