//! Extraction strategies for pulling a canonical channel id out of page HTML.
//!
//! Scraping markup for ids is inherently fragile, so strategies are kept as
//! an ordered list of independent patterns: the first capture wins, and a new
//! pattern is one more array entry — call sites never change. Neither current
//! pattern is authoritative; the canonical `<link>` is simply tried first
//! because it appears earlier in the document.

use regex::Regex;

struct ExtractionStrategy {
    name: &'static str,
    pattern: &'static str,
}

/// Strategies in priority order.
const STRATEGIES: &[ExtractionStrategy] = &[
    ExtractionStrategy {
        name: "canonical-link",
        pattern: r"https://www\.youtube\.com/channel/(UC[\w-]{22})",
    },
    ExtractionStrategy {
        name: "external-id",
        pattern: r#""externalId":"(UC[\w-]{22})""#,
    },
];

/// Runs the strategies against `html` in priority order.
///
/// Returns the first captured channel id together with the name of the
/// strategy that matched, or `None` when no strategy applies.
#[must_use]
pub fn extract_channel_id(html: &str) -> Option<(String, &'static str)> {
    for strategy in STRATEGIES {
        let re = Regex::new(strategy.pattern).expect("valid regex");
        if let Some(cap) = re.captures(html) {
            if let Some(m) = cap.get(1) {
                return Some((m.as_str().to_string(), strategy.name));
            }
        }
    }

    None
}

#[cfg(test)]
#[path = "patterns_test.rs"]
mod tests;
