//! ISO-8601 duration parsing for the `contentDetails.duration` field.

use regex::Regex;

/// Parses an ISO-8601 duration such as `PT1H5M30S` into total seconds.
///
/// Malformed or empty input parses to `0` — the API occasionally omits
/// components, and a zero-length video is filtered out downstream anyway.
#[must_use]
pub fn parse_iso8601_duration(duration: &str) -> i32 {
    if duration.is_empty() {
        return 0;
    }

    let re = Regex::new(r"^PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?$").expect("valid regex");
    let Some(caps) = re.captures(duration) else {
        return 0;
    };

    let component = |index: usize| -> i32 {
        caps.get(index)
            .and_then(|m| m.as_str().parse::<i32>().ok())
            .unwrap_or(0)
    };

    component(1) * 3600 + component(2) * 60 + component(3)
}
