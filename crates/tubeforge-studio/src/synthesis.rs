//! Synthesis stage: raw research bundle in, structured brief out.

use std::fmt::Write as _;
use std::sync::Arc;

use tubeforge_research::ResearchBundle;

use crate::angles::Angle;
use crate::brief::SynthesizedBrief;
use crate::context::{ProfileContext, StageOrigin, VideoContext};
use crate::delegate::CompletionDelegate;
use crate::payload::extract_json_object;

const TRANSCRIPT_SUMMARY_WORDS: usize = 500;
const MAX_TRENDS_IN_PROMPT: usize = 10;
const MAX_PAGES_IN_PROMPT: usize = 5;

/// Everything the synthesis prompt draws on.
pub struct SynthesisInput<'a> {
    pub video: &'a VideoContext,
    pub angle: &'a Angle,
    pub bundle: &'a ResearchBundle,
    pub profile: &'a ProfileContext,
}

/// The synthesis stage. Infallible from the caller's point of view:
/// delegate or parse failures produce the fallback brief, never an error.
pub struct Synthesizer {
    delegate: Arc<dyn CompletionDelegate>,
}

impl Synthesizer {
    #[must_use]
    pub fn new(delegate: Arc<dyn CompletionDelegate>) -> Self {
        Self { delegate }
    }

    /// Synthesizes the bundle into a brief.
    ///
    /// Missing source slots are acknowledged in the prompt rather than
    /// silently omitted, so the delegate knows what evidence it does not
    /// have. On any failure the fallback brief is returned, marked as such.
    pub async fn synthesize(&self, input: &SynthesisInput<'_>) -> SynthesizedBrief {
        let prompt = build_synthesis_prompt(input);

        let raw = match self.delegate.complete(&prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "synthesis delegate failed — using fallback brief");
                return SynthesizedBrief::fallback(input.bundle);
            }
        };

        match extract_json_object::<SynthesizedBrief>(&raw, "synthesis brief") {
            Ok(mut brief) => {
                // Facts without attribution violate the brief contract; drop
                // them rather than letting unattributed claims through.
                brief.new_facts.retain(|fact| !fact.source.is_empty());
                brief.origin = StageOrigin::Delegate;
                tracing::debug!(
                    facts = brief.new_facts.len(),
                    hooks = brief.narrative_hooks.len(),
                    "research synthesized"
                );
                brief
            }
            Err(e) => {
                tracing::warn!(error = %e, "synthesis response did not parse — using fallback brief");
                SynthesizedBrief::fallback(input.bundle)
            }
        }
    }
}

fn build_synthesis_prompt(input: &SynthesisInput<'_>) -> String {
    let mut trends_block = String::new();
    match &input.bundle.trends {
        Some(hits) => {
            for (i, hit) in hits.iter().take(MAX_TRENDS_IN_PROMPT).enumerate() {
                let _ = writeln!(
                    trends_block,
                    "{}. {}\n   URL: {}\n   Summary: {}",
                    i + 1,
                    hit.title,
                    hit.url,
                    hit.snippet
                );
            }
        }
        None => trends_block.push_str("(trend search was unavailable for this run)\n"),
    }

    let mut checks_block = String::new();
    match &input.bundle.verification {
        Some(check) => {
            let _ = writeln!(
                checks_block,
                "Query: {}\nResponse: {}",
                check.query, check.verification
            );
        }
        None => checks_block.push_str("(fact verification was unavailable for this run)\n"),
    }

    let mut pages_block = String::new();
    match &input.bundle.pages {
        Some(pages) => {
            for (i, page) in pages.iter().take(MAX_PAGES_IN_PROMPT).enumerate() {
                let _ = writeln!(
                    pages_block,
                    "{}. {}\n   Content: {}",
                    i + 1,
                    page.url,
                    page.markdown
                );
            }
        }
        None => pages_block.push_str("(page scraping was unavailable for this run)\n"),
    }

    let views = input
        .video
        .view_count
        .map_or_else(|| "unknown".to_string(), |v| v.to_string());

    format!(
        "Analyze and synthesize this research data into a structured brief for script writing.\n\n\
         **Original Video:**\n\
         - Title: {title}\n\
         - Views: {views}\n\
         - Transcript Summary (first {words} words):\n{transcript}\n\n\
         **Selected Angle:**\n\
         - Name: {angle_name}\n\
         - Hook: {angle_hook}\n\
         - Differentiator: {angle_diff}\n\
         - Target Emotion: {angle_emotion}\n\n\
         **Creator Profile:**\n\
         - Niche: {niche}\n\
         - Expertise: {expertise}\n\
         - Target Audience: {audience}\n\n\
         **Raw Research Data:**\n\n\
         Trending Topics:\n{trends_block}\n\
         Fact Checks & Recent News:\n{checks_block}\n\
         Scraped Content:\n{pages_block}\n\
         **Your Task:**\n\
         Synthesize this research into a structured brief for a script writer. Focus on:\n\n\
         1. Identify 5-8 NEW facts/data points NOT in the original video\n\
         2. Find contradictions or updates to original video claims\n\
         3. Extract compelling statistics, quotes, and examples\n\
         4. Organize by narrative flow (hook, introduction, body, conclusion)\n\
         5. Note which sources are most credible/relevant\n\
         6. Suggest 3 narrative hooks based on most compelling findings\n\n\
         Where a research source was unavailable, work from the remaining \
         sources and do not invent data for the missing one.\n\n\
         **Output Format:**\n\
         Return ONLY valid JSON with this structure:\n\n\
         {{\n\
           \"executive_summary\": \"Brief overview of key findings (2-3 sentences)\",\n\
           \"new_facts\": [{{\"fact\": \"...\", \"source\": \"URL or source name\", \
         \"credibility\": \"high|medium|low\", \"placement_suggestion\": \
         \"hook|introduction|body|conclusion\"}}],\n\
           \"updated_claims\": [{{\"original\": \"...\", \"update\": \"...\", \"source\": \"...\"}}],\n\
           \"key_statistics\": [{{\"statistic\": \"...\", \"context\": \"...\", \"source\": \"...\"}}],\n\
           \"compelling_quotes\": [{{\"quote\": \"...\", \"attribution\": \"...\", \"source\": \"...\"}}],\n\
           \"narrative_hooks\": [\"...\", \"...\", \"...\"],\n\
           \"supporting_evidence\": [{{\"point\": \"...\", \"evidence\": \"...\", \"source\": \"...\"}}]\n\
         }}",
        title = input.video.title,
        views = views,
        words = TRANSCRIPT_SUMMARY_WORDS,
        transcript = input.video.transcript_summary(TRANSCRIPT_SUMMARY_WORDS),
        angle_name = input.angle.angle_name,
        angle_hook = input.angle.core_hook,
        angle_diff = input.angle.key_differentiator,
        angle_emotion = input.angle.target_emotion,
        niche = input.profile.niche,
        expertise = input.profile.expertise_line(),
        audience = input.profile.target_audience,
        trends_block = trends_block,
        checks_block = checks_block,
        pages_block = pages_block,
    )
}

#[cfg(test)]
#[path = "synthesis_test.rs"]
mod tests;
