//! Synthesis and generation stages, backed by LLM completion delegates.
//!
//! One delegate interface serves both stages — the cheap/fast synthesizer
//! and the higher-quality generator are the same capability parameterized by
//! role, not a class hierarchy. Every stage follows the same shape: build a
//! prompt, call the delegate, run the tolerant parse, and on any failure
//! fall back to a minimal, clearly-marked default so downstream stages never
//! see an empty structure.

mod angles;
mod brief;
mod context;
mod corpus;
mod delegate;
mod error;
mod generation;
mod payload;
mod suggestions;
mod synthesis;
#[cfg(test)]
pub(crate) mod test_support;

pub use angles::{Angle, AngleGenerator};
pub use brief::{
    Credibility, Evidence, KeyStatistic, Placement, Quote, ResearchFact, SynthesizedBrief,
    UpdatedClaim,
};
pub use context::{ProfileContext, StageOrigin, VideoContext};
pub use corpus::KnowledgeCorpus;
pub use delegate::{CompletionDelegate, DelegateRole, HttpDelegate};
pub use error::StudioError;
pub use generation::{Generator, ScriptPackage};
pub use payload::{extract_json_array, extract_json_object, strip_code_fences};
pub use suggestions::ChannelSuggester;
pub use synthesis::{SynthesisInput, Synthesizer};
