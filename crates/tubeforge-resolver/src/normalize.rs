//! Input normalization: handle sigils, pasted URLs, and channel-id passthrough.

/// What a raw user input normalized to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedInput {
    /// Already a canonical channel id — no fetch needed.
    ChannelId(String),
    /// A handle, guaranteed to carry the leading `@` sigil.
    Handle(String),
    /// A full channel-page URL with no embedded handle (custom `/c/` or
    /// `/channel/` link) — fetched as-is.
    Url(String),
}

/// Returns whether `s` already is a canonical channel id (`UC` + 22 chars).
#[must_use]
pub fn is_channel_id(s: &str) -> bool {
    s.len() == 24
        && s.starts_with("UC")
        && s.bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// Normalizes a free-form channel input.
///
/// Accepted forms:
/// - a canonical channel id (`UC...`), passed through untouched;
/// - a handle with or without the `@` sigil (`@MrBeast`, `MrBeast`);
/// - a pasted URL (`https://youtube.com/@MrBeast?si=x`,
///   `https://www.youtube.com/channel/UC...`).
#[must_use]
pub fn normalize(input: &str) -> NormalizedInput {
    let trimmed = input.trim();

    if is_channel_id(trimmed) {
        return NormalizedInput::ChannelId(trimmed.to_string());
    }

    if trimmed.contains("youtube.com") || trimmed.contains("youtu.be") {
        let has_handle =
            trimmed.contains('@') && !trimmed.contains("channel/") && !trimmed.contains("/c/");
        if has_handle {
            // Pull the handle segment out of the URL and drop any query string.
            let tail = trimmed
                .rsplit("youtube.com/")
                .next()
                .unwrap_or(trimmed)
                .split('?')
                .next()
                .unwrap_or(trimmed)
                .trim_matches('/');
            return NormalizedInput::Handle(ensure_sigil(tail));
        }
        return NormalizedInput::Url(trimmed.to_string());
    }

    NormalizedInput::Handle(ensure_sigil(trimmed))
}

fn ensure_sigil(handle: &str) -> String {
    if handle.starts_with('@') {
        handle.to_string()
    } else {
        format!("@{handle}")
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
