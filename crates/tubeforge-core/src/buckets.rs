//! View-count bucketing and the Shorts duration cutoff.

use serde::{Deserialize, Serialize};

/// Categorical grouping of a long-form video by view count.
///
/// Boundaries are closed-open (`[5k, 10k)` and so on) except the top bucket,
/// which is unbounded. Videos under 5 000 views fall in no bucket at all —
/// [`ViewBucket::from_views`] returns `None` for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewBucket {
    #[serde(rename = "5-10k")]
    K5To10,
    #[serde(rename = "10-50k")]
    K10To50,
    #[serde(rename = "50-100k")]
    K50To100,
    #[serde(rename = "100k-1M")]
    K100To1M,
    #[serde(rename = "1M+")]
    M1Plus,
}

impl ViewBucket {
    /// Buckets a view count, or `None` when the count is below the 5k floor.
    #[must_use]
    pub fn from_views(views: i64) -> Option<Self> {
        if views >= 1_000_000 {
            Some(ViewBucket::M1Plus)
        } else if views >= 100_000 {
            Some(ViewBucket::K100To1M)
        } else if views >= 50_000 {
            Some(ViewBucket::K50To100)
        } else if views >= 10_000 {
            Some(ViewBucket::K10To50)
        } else if views >= 5_000 {
            Some(ViewBucket::K5To10)
        } else {
            None
        }
    }

    /// The label stored in the `videos.view_bucket` column.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ViewBucket::K5To10 => "5-10k",
            ViewBucket::K10To50 => "10-50k",
            ViewBucket::K50To100 => "50-100k",
            ViewBucket::K100To1M => "100k-1M",
            ViewBucket::M1Plus => "1M+",
        }
    }

    /// Parses a stored label back into a bucket.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "5-10k" => Some(ViewBucket::K5To10),
            "10-50k" => Some(ViewBucket::K10To50),
            "50-100k" => Some(ViewBucket::K50To100),
            "100k-1M" => Some(ViewBucket::K100To1M),
            "1M+" => Some(ViewBucket::M1Plus),
            _ => None,
        }
    }
}

impl std::fmt::Display for ViewBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a video counts as a Short: strictly under `threshold_secs`.
#[must_use]
pub fn is_short(duration_seconds: i32, threshold_secs: i32) -> bool {
    duration_seconds < threshold_secs
}

#[cfg(test)]
#[path = "buckets_test.rs"]
mod tests;
