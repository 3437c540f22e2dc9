//! Bundle and per-source result types.

use serde::{Deserialize, Serialize};

/// The three source slots, in the order they are attempted.
pub const SOURCE_NAMES: [&str; 3] = ["trends", "verification", "scrape"];

/// One hit from the trend-search source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendHit {
    pub title: String,
    pub url: String,
    /// Content snippet, truncated at collection time.
    pub snippet: String,
    #[serde(default)]
    pub score: f64,
}

/// The verification source's answer for a claim set (or a general query).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactCheck {
    /// The query that was sent, kept for auditability.
    pub query: String,
    pub verification: String,
    /// Attribution string for downstream fact tagging.
    pub source: String,
}

/// One scraped page from the secondary fan-out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapedPage {
    pub url: String,
    /// Page content as markdown, truncated at collection time.
    pub markdown: String,
    #[serde(default)]
    pub excerpts: Vec<String>,
}

/// Raw per-source results for one research round.
///
/// Every slot may be absent — a source that failed is recorded as `None`
/// without invalidating the bundle. Merging is keyed by source name, never
/// by arrival order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchBundle {
    pub topic: String,
    pub trends: Option<Vec<TrendHit>>,
    pub verification: Option<FactCheck>,
    pub pages: Option<Vec<ScrapedPage>>,
}

impl ResearchBundle {
    /// An all-absent bundle, used when research as a whole is skipped or
    /// degraded away.
    #[must_use]
    pub fn empty(topic: &str) -> Self {
        Self {
            topic: topic.to_string(),
            trends: None,
            verification: None,
            pages: None,
        }
    }

    /// Names of the slots that populated.
    #[must_use]
    pub fn sources_used(&self) -> Vec<&'static str> {
        let mut used = Vec::new();
        if self.trends.is_some() {
            used.push(SOURCE_NAMES[0]);
        }
        if self.verification.is_some() {
            used.push(SOURCE_NAMES[1]);
        }
        if self.pages.is_some() {
            used.push(SOURCE_NAMES[2]);
        }
        used
    }

    /// Names of the slots that failed or were never attempted.
    #[must_use]
    pub fn missing_sources(&self) -> Vec<&'static str> {
        let used = self.sources_used();
        SOURCE_NAMES
            .into_iter()
            .filter(|name| !used.contains(name))
            .collect()
    }

    /// Whether any slot populated at all.
    #[must_use]
    pub fn has_any_source(&self) -> bool {
        !self.sources_used().is_empty()
    }
}

/// Truncates a string to at most `max_bytes` bytes at a character boundary.
pub(crate) fn truncate_to_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) && end > 0 {
        end -= 1;
    }
    &s[..end]
}
