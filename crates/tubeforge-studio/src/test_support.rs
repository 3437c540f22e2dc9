//! Shared test doubles for the delegate-backed stages.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::angles::Angle;
use crate::context::{ProfileContext, VideoContext};
use crate::delegate::{CompletionDelegate, DelegateRole};
use crate::error::StudioError;

/// A delegate that replays a canned completion (or fails when given none)
/// and records every prompt it was sent.
pub(crate) struct StaticDelegate {
    role: DelegateRole,
    response: Option<String>,
    pub prompts: Mutex<Vec<String>>,
}

impl StaticDelegate {
    pub fn completing(role: DelegateRole, response: &str) -> Self {
        Self {
            role,
            response: Some(response.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(role: DelegateRole) -> Self {
        Self {
            role,
            response: None,
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl CompletionDelegate for StaticDelegate {
    fn role(&self) -> DelegateRole {
        self.role
    }

    async fn complete(&self, prompt: &str) -> Result<String, StudioError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.response {
            Some(response) => Ok(response.clone()),
            None => Err(StudioError::Delegate {
                role: self.role,
                message: "forced failure".to_string(),
            }),
        }
    }
}

pub(crate) fn test_video() -> VideoContext {
    VideoContext {
        video_id: "vid00000001".to_string(),
        title: "How Compilers Actually Work".to_string(),
        view_count: Some(1_200_000),
        transcript: "Compilers are translators. They turn source code into machine code. \
                     The market for developer tools is worth 3 billion dollars."
            .to_string(),
    }
}

pub(crate) fn test_profile() -> ProfileContext {
    ProfileContext {
        creator_name: "Casey".to_string(),
        niche: "systems programming".to_string(),
        tone: "direct, technical".to_string(),
        target_audience: "working engineers".to_string(),
        expertise: vec!["compilers".to_string(), "performance".to_string()],
        bio: "Ex-compiler engineer turned educator".to_string(),
    }
}

pub(crate) fn test_angle() -> Angle {
    Angle {
        angle_name: "The Part Nobody Benchmarks".to_string(),
        core_hook: "Your compiler spends most of its time doing something nobody measures."
            .to_string(),
        key_differentiator: "Profiles a real compiler live instead of quoting folklore."
            .to_string(),
        target_emotion: "curiosity".to_string(),
        estimated_appeal: "high".to_string(),
        why_this_works: "Specific, measurable, contrarian.".to_string(),
    }
}
