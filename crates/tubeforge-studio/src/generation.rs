//! Generation stage: brief + angle + profile + corpus in, script package out.

use std::fmt::Write as _;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::angles::Angle;
use crate::brief::SynthesizedBrief;
use crate::context::{ProfileContext, StageOrigin, VideoContext};
use crate::corpus::KnowledgeCorpus;
use crate::delegate::CompletionDelegate;
use crate::payload::extract_json_object;

const TRANSCRIPT_CONTEXT_WORDS: usize = 300;
const CORPUS_EXAMPLES: usize = 3;
pub(crate) const VARIANT_COUNT: usize = 4;

#[derive(Debug, Deserialize)]
struct RawScriptResponse {
    script: String,
    #[serde(default)]
    titles: Vec<String>,
    #[serde(default)]
    thumbnails: Vec<String>,
}

/// Final generation output: the script plus exactly four title variants and
/// four thumbnail-concept variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptPackage {
    pub script: String,
    pub titles: Vec<String>,
    pub thumbnails: Vec<String>,
    pub origin: StageOrigin,
}

/// The generation stage. Infallible from the caller's point of view: a
/// delegate failure, parse failure, or wrong variant count yields the
/// clearly-marked fallback package — never an error to the end user.
pub struct Generator {
    delegate: Arc<dyn CompletionDelegate>,
    corpus: KnowledgeCorpus,
}

impl Generator {
    #[must_use]
    pub fn new(delegate: Arc<dyn CompletionDelegate>, corpus: KnowledgeCorpus) -> Self {
        Self { delegate, corpus }
    }

    /// Generates the script package for a brief.
    pub async fn generate(
        &self,
        video: &VideoContext,
        angle: &Angle,
        brief: &SynthesizedBrief,
        profile: &ProfileContext,
    ) -> ScriptPackage {
        let prompt = self.build_script_prompt(video, angle, brief, profile);

        let raw = match self.delegate.complete(&prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "generation delegate failed — using fallback script");
                return fallback_package(video, angle);
            }
        };

        match extract_json_object::<RawScriptResponse>(&raw, "script package") {
            Ok(parsed) => match into_package(parsed) {
                Some(package) => {
                    tracing::debug!(chars = package.script.len(), "generated script package");
                    package
                }
                None => {
                    tracing::warn!("script response missing variants — using fallback script");
                    fallback_package(video, angle)
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "script response did not parse — using fallback script");
                fallback_package(video, angle)
            }
        }
    }

    fn build_script_prompt(
        &self,
        video: &VideoContext,
        angle: &Angle,
        brief: &SynthesizedBrief,
        profile: &ProfileContext,
    ) -> String {
        let mut corpus_block = String::new();
        if !self.corpus.is_empty() {
            corpus_block.push_str(
                "\n**Knowledge Base (Proven Success Patterns):**\n\
                 Transcripts from videos about making successful content. Use these as \
                 examples of proven hooks, structures, and retention techniques:\n\n",
            );
            for (i, (title, excerpt)) in
                self.corpus.examples(CORPUS_EXAMPLES).into_iter().enumerate()
            {
                let _ = writeln!(corpus_block, "{}. \"{title}\"\n   {excerpt}...\n", i + 1);
            }
        }

        let mut facts_block = String::new();
        for fact in brief.new_facts.iter().take(8) {
            let _ = writeln!(facts_block, "- {} (Source: {})", fact.fact, fact.source);
        }

        let mut hooks_block = String::new();
        for hook in &brief.narrative_hooks {
            let _ = writeln!(hooks_block, "- {hook}");
        }

        let views = video
            .view_count
            .map_or_else(|| "unknown".to_string(), |v| v.to_string());

        format!(
            "Create a high-retention video script using this research brief and angle.\n\n\
             **Original Video Context:**\n\
             - Title: {title}\n\
             - Views: {views}\n\
             - Main Points (first {words} words):\n{transcript}\n\n\
             **Selected Angle:**\n\
             - Name: {angle_name}\n\
             - Hook: {angle_hook}\n\
             - Differentiator: {angle_diff}\n\
             - Target Emotion: {angle_emotion}\n\n\
             **Research Brief (Pre-Synthesized):**\n\n\
             Executive Summary:\n{summary}\n\n\
             New Facts to Incorporate:\n{facts_block}\n\
             Suggested Narrative Hooks:\n{hooks_block}\n\
             Key Statistics: {stat_count} stats available\n\
             Compelling Quotes: {quote_count} quotes available\n\
             Supporting Evidence: {evidence_count} evidence points available\n\n\
             **Creator Profile:**\n\
             - Name: {creator}\n\
             - Niche: {niche}\n\
             - Tone: {tone}\n\
             - Target Audience: {audience}\n\
             - Expertise: {expertise}\n\
             {corpus_block}\n\
             **Your Task:**\n\
             Write a complete video script that:\n\n\
             1. **Hook** (0-5 seconds): Use one of the suggested narrative hooks or the \
             most compelling fact\n\
             2. **Introduction** (5-30 seconds): Set up the angle and value promise\n\
             3. **Main Content** (7-10 minutes): Incorporate ALL new facts naturally, cite \
             sources for data, use storytelling, match the creator's tone, include pattern \
             interrupts every 60-90 seconds\n\
             4. **Conclusion & CTA** (30-60 seconds): Strong recap and call to action\n\n\
             **Style Guidelines:**\n\
             - Length: 8-12 minutes (approximately 1800-2200 words)\n\
             - Conversational language with \"you\" and \"I\"\n\
             - Rhetorical questions to maintain engagement\n\
             - Verbal cues for B-roll\n\n\
             **Also Generate:**\n\
             1. Four high-CTR title variations (power words specific to {niche})\n\
             2. Four thumbnail description variations (visual concepts that create curiosity)\n\n\
             **Output Format:**\n\
             Return ONLY valid JSON with this structure:\n\n\
             {{\n\
               \"script\": \"The complete script with [HOOK], [INTRO], [BODY], [CONCLUSION] markers\",\n\
               \"titles\": [\"...\", \"...\", \"...\", \"...\"],\n\
               \"thumbnails\": [\"...\", \"...\", \"...\", \"...\"]\n\
             }}",
            title = video.title,
            views = views,
            words = TRANSCRIPT_CONTEXT_WORDS,
            transcript = video.transcript_summary(TRANSCRIPT_CONTEXT_WORDS),
            angle_name = angle.angle_name,
            angle_hook = angle.core_hook,
            angle_diff = angle.key_differentiator,
            angle_emotion = angle.target_emotion,
            summary = brief.executive_summary,
            facts_block = facts_block,
            hooks_block = hooks_block,
            stat_count = brief.key_statistics.len(),
            quote_count = brief.compelling_quotes.len(),
            evidence_count = brief.supporting_evidence.len(),
            creator = profile.creator_name,
            niche = profile.niche,
            tone = profile.tone,
            audience = profile.target_audience,
            expertise = profile.expertise_line(),
            corpus_block = corpus_block,
        )
    }
}

/// Validates the raw response into a package with exactly four variants of
/// each kind. Extra variants are dropped; too few means the response does
/// not satisfy the contract and the caller falls back.
fn into_package(raw: RawScriptResponse) -> Option<ScriptPackage> {
    if raw.script.is_empty() {
        return None;
    }

    let titles: Vec<String> = raw
        .titles
        .into_iter()
        .filter(|t| !t.is_empty())
        .take(VARIANT_COUNT)
        .collect();
    let thumbnails: Vec<String> = raw
        .thumbnails
        .into_iter()
        .filter(|t| !t.is_empty())
        .take(VARIANT_COUNT)
        .collect();

    if titles.len() < VARIANT_COUNT || thumbnails.len() < VARIANT_COUNT {
        return None;
    }

    Some(ScriptPackage {
        script: raw.script,
        titles,
        thumbnails,
        origin: StageOrigin::Delegate,
    })
}

/// The minimal package used when the delegate fails: a skeletal script plus
/// four non-empty placeholder titles and thumbnail concepts.
fn fallback_package(video: &VideoContext, angle: &Angle) -> ScriptPackage {
    let script = format!(
        "[HOOK]\n{hook}\n\n\
         [INTRO]\nIn this video, we're taking a fresh look at {title} from a different angle.\n\
         {diff}\n\n\
         [BODY]\nBased on the research, here are the key points to cover:\n\
         - [Point 1 from research]\n\
         - [Point 2 from research]\n\
         - [Point 3 from research]\n\n\
         [CONCLUSION]\nSo there you have it. If you found this valuable, make sure to like \
         and subscribe for more content like this.\n",
        hook = angle.core_hook,
        title = video.title,
        diff = angle.key_differentiator,
    );

    ScriptPackage {
        script,
        titles: vec![
            format!("The Truth About {}", video.title),
            format!("What They Don't Tell You About {}", video.title),
            format!("I Analyzed {} - Here's What I Found", video.title),
            format!("{}: Deep Dive", angle.angle_name),
        ],
        thumbnails: vec![
            "Large text: 'THE TRUTH' with surprised face expression".to_string(),
            "Before/After comparison split screen".to_string(),
            "Creator pointing at screen with key stat highlighted".to_string(),
            "Contrarian viewpoint with crossed arms, serious expression".to_string(),
        ],
        origin: StageOrigin::Fallback,
    }
}

#[cfg(test)]
#[path = "generation_test.rs"]
mod tests;
