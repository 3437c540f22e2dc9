//! Claim extraction from a transcript, for the verification source.

const CLAIM_KEYWORDS: [&str; 10] = [
    "is", "are", "was", "were", "will", "has", "have", "%", "million", "billion",
];

const MIN_SENTENCE_LEN: usize = 20;
const MAX_SENTENCE_LEN: usize = 200;
const MAX_SENTENCES_SCANNED: usize = 50;

/// Pulls up to `max_claims` checkable statements out of a transcript.
///
/// A cheap keyword heuristic over the first sentences: factual-sounding
/// statements of reasonable length. Good enough to seed the verification
/// query — the verifier does the actual checking.
#[must_use]
pub fn extract_claims(transcript: &str, max_claims: usize) -> Vec<String> {
    let mut claims = Vec::new();

    for sentence in transcript.split('.').take(MAX_SENTENCES_SCANNED) {
        let sentence = sentence.trim();
        if sentence.len() < MIN_SENTENCE_LEN || sentence.len() > MAX_SENTENCE_LEN {
            continue;
        }

        let lowered = sentence.to_lowercase();
        if CLAIM_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
            claims.push(sentence.to_string());
        }

        if claims.len() >= max_claims {
            break;
        }
    }

    claims
}
