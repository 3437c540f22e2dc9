//! Static knowledge corpus: exemplar transcripts loaded once, read-only.

use std::collections::BTreeMap;
use std::path::Path;

const EXAMPLE_EXCERPT_CHARS: usize = 1_000;

/// Exemplar transcripts keyed by title, used as few-shot context in the
/// generation prompt.
///
/// Loaded once at startup. A missing or unreadable file degrades to an
/// empty corpus with a warning — generation proceeds without examples
/// rather than failing.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeCorpus {
    entries: BTreeMap<String, String>,
}

impl KnowledgeCorpus {
    /// Loads the corpus from a JSON object file (`title -> transcript`).
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "knowledge corpus not found — continuing without examples");
                return Self::default();
            }
        };

        match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
            Ok(entries) => {
                tracing::info!(path = %path.display(), count = entries.len(), "loaded knowledge corpus");
                Self { entries }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "knowledge corpus did not parse — continuing without examples");
                Self::default()
            }
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns up to `count` `(title, excerpt)` pairs for prompt context.
    /// Excerpts are truncated to keep the prompt bounded.
    #[must_use]
    pub fn examples(&self, count: usize) -> Vec<(&str, &str)> {
        self.entries
            .iter()
            .take(count)
            .map(|(title, transcript)| {
                let mut end = EXAMPLE_EXCERPT_CHARS.min(transcript.len());
                while !transcript.is_char_boundary(end) {
                    end -= 1;
                }
                (title.as_str(), &transcript[..end])
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_degrades_to_empty_corpus() {
        let corpus = KnowledgeCorpus::load(Path::new("/definitely/not/here.json"));
        assert!(corpus.is_empty());
        assert_eq!(corpus.len(), 0);
        assert!(corpus.examples(3).is_empty());
    }

    #[test]
    fn examples_truncate_long_transcripts() {
        let dir = std::env::temp_dir().join("tubeforge-corpus-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("corpus.json");
        let long = "x".repeat(5_000);
        let body = serde_json::json!({
            "How I Got 10M Views": long,
            "Retention Masterclass": "short transcript",
        });
        std::fs::write(&path, serde_json::to_string(&body).unwrap()).unwrap();

        let corpus = KnowledgeCorpus::load(&path);
        assert_eq!(corpus.len(), 2);

        let examples = corpus.examples(2);
        assert_eq!(examples.len(), 2);
        let long_example = examples
            .iter()
            .find(|(title, _)| *title == "How I Got 10M Views")
            .unwrap();
        assert!(long_example.1.len() <= 1_000);
        let short_example = examples
            .iter()
            .find(|(title, _)| *title == "Retention Masterclass")
            .unwrap();
        assert_eq!(short_example.1, "short transcript");
    }

    #[test]
    fn malformed_corpus_degrades_to_empty() {
        let dir = std::env::temp_dir().join("tubeforge-corpus-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.json");
        std::fs::write(&path, "not json").unwrap();

        let corpus = KnowledgeCorpus::load(&path);
        assert!(corpus.is_empty());
    }
}
