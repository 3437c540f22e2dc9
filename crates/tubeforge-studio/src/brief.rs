//! The synthesized research brief: the intermediate representation between
//! research gathering and script generation.

use serde::{Deserialize, Serialize};

use tubeforge_research::ResearchBundle;

use crate::context::StageOrigin;

/// Credibility tag attached to every synthesized fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Credibility {
    High,
    Medium,
    Low,
}

/// Narrative placement suggestion for a fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Hook,
    Introduction,
    Body,
    Conclusion,
}

/// One new fact surfaced by research. Every fact carries a source
/// attribution string — a fact with no source never enters a brief.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchFact {
    pub fact: String,
    pub source: String,
    pub credibility: Credibility,
    #[serde(rename = "placement_suggestion")]
    pub placement: Placement,
}

/// An original-video claim that research updated or contradicted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatedClaim {
    pub original: String,
    pub update: String,
    pub source: String,
}

/// A compelling statistic with context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyStatistic {
    pub statistic: String,
    pub context: String,
    pub source: String,
}

/// A quotable line with attribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub quote: String,
    pub attribution: String,
    pub source: String,
}

/// A script point with its supporting evidence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evidence {
    pub point: String,
    pub evidence: String,
    pub source: String,
}

/// Structured brief consumed by the generation stage.
///
/// Always well-formed: when synthesis degrades, the fallback brief still
/// carries whatever facts the bundle yielded, and `origin` marks it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesizedBrief {
    pub executive_summary: String,
    #[serde(default)]
    pub new_facts: Vec<ResearchFact>,
    #[serde(default)]
    pub updated_claims: Vec<UpdatedClaim>,
    #[serde(default)]
    pub key_statistics: Vec<KeyStatistic>,
    #[serde(default)]
    pub compelling_quotes: Vec<Quote>,
    #[serde(default)]
    pub narrative_hooks: Vec<String>,
    #[serde(default)]
    pub supporting_evidence: Vec<Evidence>,
    #[serde(default = "default_origin")]
    pub origin: StageOrigin,
}

fn default_origin() -> StageOrigin {
    StageOrigin::Delegate
}

impl SynthesizedBrief {
    /// Builds the minimal fallback brief from a (possibly partial) bundle.
    ///
    /// Trend hits become medium-credibility body facts attributed to their
    /// URLs; the static hooks keep the generator moving. Explicitly labeled
    /// so nothing downstream mistakes it for delegate output.
    #[must_use]
    pub fn fallback(bundle: &ResearchBundle) -> Self {
        let new_facts = bundle
            .trends
            .iter()
            .flatten()
            .take(5)
            .map(|hit| ResearchFact {
                fact: hit.title.clone(),
                source: hit.url.clone(),
                credibility: Credibility::Medium,
                placement: Placement::Body,
            })
            .collect();

        Self {
            executive_summary: "Research data compiled from multiple sources. Use the \
                                trending topics and fact-checks to enhance the script."
                .to_string(),
            new_facts,
            updated_claims: Vec::new(),
            key_statistics: Vec::new(),
            compelling_quotes: Vec::new(),
            narrative_hooks: vec![
                "What if everything you know about this is wrong?".to_string(),
                "The data reveals something surprising...".to_string(),
                "Here's what the experts aren't telling you...".to_string(),
            ],
            supporting_evidence: Vec::new(),
            origin: StageOrigin::Fallback,
        }
    }
}
