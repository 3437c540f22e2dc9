//! Angle generation: creative re-angles for a cached video, tailored to the
//! creator's profile.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::context::{ProfileContext, VideoContext};
use crate::delegate::CompletionDelegate;
use crate::payload::extract_json_array;

const TRANSCRIPT_CONTEXT_WORDS: usize = 1_500;
const MAX_ANGLES: usize = 5;
const MIN_ANGLES: usize = 3;

/// One creative angle a creator could take on a topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Angle {
    pub angle_name: String,
    pub core_hook: String,
    pub key_differentiator: String,
    #[serde(default)]
    pub target_emotion: String,
    #[serde(default)]
    pub estimated_appeal: String,
    #[serde(default)]
    pub why_this_works: String,
}

/// Generates 3-5 angles via the delegate, with a static fallback set when
/// the delegate or parse fails.
pub struct AngleGenerator {
    delegate: Arc<dyn CompletionDelegate>,
}

impl AngleGenerator {
    #[must_use]
    pub fn new(delegate: Arc<dyn CompletionDelegate>) -> Self {
        Self { delegate }
    }

    /// Generates angles for a video. Never fails — a delegate or parse
    /// failure yields the fallback set.
    pub async fn generate(&self, video: &VideoContext, profile: &ProfileContext) -> Vec<Angle> {
        let prompt = build_angle_prompt(video, profile);

        let raw = match self.delegate.complete(&prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "angle delegate failed — using fallback angles");
                return fallback_angles(video);
            }
        };

        match extract_json_array::<Vec<Angle>>(&raw, "angles") {
            Ok(angles) => {
                let valid: Vec<Angle> = angles
                    .into_iter()
                    .filter(|a| {
                        !a.angle_name.is_empty()
                            && !a.core_hook.is_empty()
                            && !a.key_differentiator.is_empty()
                    })
                    .take(MAX_ANGLES)
                    .collect();
                if valid.len() >= MIN_ANGLES {
                    tracing::debug!(count = valid.len(), "generated angles");
                    valid
                } else {
                    tracing::warn!(
                        count = valid.len(),
                        "too few valid angles — using fallback angles"
                    );
                    fallback_angles(video)
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "angle response did not parse — using fallback angles");
                fallback_angles(video)
            }
        }
    }
}

fn build_angle_prompt(video: &VideoContext, profile: &ProfileContext) -> String {
    let views = video
        .view_count
        .map_or_else(|| "unknown".to_string(), |v| v.to_string());

    format!(
        "You are a viral video strategist who specializes in finding unique, compelling \
         angles that haven't been done before.\n\n\
         ## THE VIDEO YOU'RE ANALYZING:\n\n\
         **Title:** {title}\n\
         **Performance:** {views} views\n\n\
         **What the video actually covers:**\n{transcript}\n\n\
         ---\n\n\
         ## THE CREATOR WHO WANTS TO MAKE THEIR VERSION:\n\n\
         **Creator:** {creator}\n\
         **Their Niche:** {niche}\n\
         **Expertise Areas:** {expertise}\n\
         **Their Style/Tone:** {tone}\n\
         **Target Audience:** {audience}\n\
         **About Them:** {bio}\n\n\
         ---\n\n\
         ## YOUR MISSION:\n\n\
         Generate 4 UNIQUE angles this creator could use to make their own video on this \
         topic.\n\n\
         ### CRITICAL RULES:\n\n\
         1. NO GENERIC TEMPLATES - nothing like \"Deep Dive Analysis\" or \"Beginner's Guide\".\n\
         2. SPECIFICITY IS EVERYTHING - each angle must reference specific concepts from \
         the transcript and the creator's specific expertise.\n\
         3. THE HOOK MUST STOP THE SCROLL - open loops, challenged beliefs, insider \
         knowledge, specific numbers.\n\
         4. THINK LIKE A STRATEGIST - what is this creator uniquely positioned to say?\n\n\
         ## OUTPUT FORMAT:\n\n\
         Return ONLY a valid JSON array. No markdown, no explanations.\n\n\
         Each angle object must have:\n\
         - \"angle_name\": a catchy, SPECIFIC name\n\
         - \"core_hook\": the opening line that makes viewers click\n\
         - \"key_differentiator\": why this angle differs from the original AND other creators\n\
         - \"target_emotion\": one of: curiosity, outrage, hope, fear, excitement, validation\n\
         - \"estimated_appeal\": \"high\" or \"medium\"\n\
         - \"why_this_works\": one sentence explaining why this angle will perform\n\n\
         Now generate 4 angles for the video above, tailored to this specific creator:",
        title = video.title,
        views = views,
        transcript = video.transcript_summary(TRANSCRIPT_CONTEXT_WORDS),
        creator = profile.creator_name,
        niche = profile.niche,
        expertise = profile.expertise_line(),
        tone = profile.tone,
        audience = profile.target_audience,
        bio = profile.bio,
    )
}

/// Less tailored than delegate output, but structurally complete.
fn fallback_angles(video: &VideoContext) -> Vec<Angle> {
    let title = &video.title;
    vec![
        Angle {
            angle_name: format!("The Truth About {title}"),
            core_hook: "Everyone's covering this story, but the most important detail keeps \
                        getting left out."
                .to_string(),
            key_differentiator: "Leads with the overlooked detail instead of the headline."
                .to_string(),
            target_emotion: "curiosity".to_string(),
            estimated_appeal: "medium".to_string(),
            why_this_works: "Information-gap hooks reliably outperform straight recaps."
                .to_string(),
        },
        Angle {
            angle_name: "What Happens Next".to_string(),
            core_hook: "This story isn't over — here's what the next six months look like."
                .to_string(),
            key_differentiator: "Forward-looking where the original is retrospective.".to_string(),
            target_emotion: "excitement".to_string(),
            estimated_appeal: "medium".to_string(),
            why_this_works: "Prediction framing gives viewers a reason to come back.".to_string(),
        },
        Angle {
            angle_name: "The Practical Playbook".to_string(),
            core_hook: "Forget the theory — here's exactly what you should do with this."
                .to_string(),
            key_differentiator: "Actionable steps instead of commentary.".to_string(),
            target_emotion: "hope".to_string(),
            estimated_appeal: "medium".to_string(),
            why_this_works: "Utility content earns saves and shares.".to_string(),
        },
        Angle {
            angle_name: "What Everyone Gets Wrong".to_string(),
            core_hook: "The most repeated claim about this topic doesn't survive contact with \
                        the data."
                .to_string(),
            key_differentiator: "Mythbusting against the consensus take.".to_string(),
            target_emotion: "validation".to_string(),
            estimated_appeal: "medium".to_string(),
            why_this_works: "Contrarian angles with receipts drive comments.".to_string(),
        },
    ]
}

#[cfg(test)]
#[path = "angles_test.rs"]
mod tests;
