//! Tolerant parsing of structured payloads out of delegate completions.
//!
//! Delegates are asked for bare JSON but routinely wrap it in markdown code
//! fences or prose. This module is the single place that noise is handled;
//! business logic only ever sees a typed value or a parse error it can turn
//! into its stage fallback.

use serde::de::DeserializeOwned;

use crate::error::StudioError;

/// Strips markdown code fences and surrounding whitespace from a completion.
#[must_use]
pub fn strip_code_fences(response: &str) -> &str {
    response
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

/// Parses a JSON object payload out of a completion.
///
/// Strips fences first, then falls back to the outermost `{...}` span when
/// the delegate padded the payload with prose.
///
/// # Errors
///
/// Returns [`StudioError::Parse`] when no parseable object is present.
pub fn extract_json_object<T: DeserializeOwned>(
    response: &str,
    context: &str,
) -> Result<T, StudioError> {
    extract_json(response, context, '{', '}')
}

/// Parses a JSON array payload out of a completion.
///
/// # Errors
///
/// Returns [`StudioError::Parse`] when no parseable array is present.
pub fn extract_json_array<T: DeserializeOwned>(
    response: &str,
    context: &str,
) -> Result<T, StudioError> {
    extract_json(response, context, '[', ']')
}

fn extract_json<T: DeserializeOwned>(
    response: &str,
    context: &str,
    open: char,
    close: char,
) -> Result<T, StudioError> {
    let cleaned = strip_code_fences(response);

    let direct = serde_json::from_str::<T>(cleaned);
    let err = match direct {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    // Second chance: the delegate wrapped the payload in prose. Take the
    // outermost bracketed span and try again.
    if let (Some(start), Some(end)) = (cleaned.find(open), cleaned.rfind(close)) {
        if start < end {
            if let Ok(value) = serde_json::from_str::<T>(&cleaned[start..=end]) {
                return Ok(value);
            }
        }
    }

    Err(StudioError::Parse {
        context: context.to_string(),
        source: err,
    })
}
