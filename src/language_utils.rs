use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities
///
/// Stored languages are opaque, case-sensitive codes. ISO 639 validation is
/// only applied to the configured admin language choices.

/// Validate that a code is a known ISO 639-1 (2-letter) or ISO 639-3
/// (3-letter) code
pub fn validate_language_code(code: &str) -> Result<Language> {
    let normalized_code = code.trim().to_lowercase();

    let language = match normalized_code.len() {
        2 => Language::from_639_1(&normalized_code),
        3 => Language::from_639_3(&normalized_code),
        _ => None,
    };

    language.ok_or_else(|| anyhow!("Invalid language code: {}", code))
}

/// Get the English language name for a code
pub fn get_language_name(code: &str) -> Result<String> {
    let language = validate_language_code(code)?;
    Ok(language.to_name().to_string())
}

/// Display label for a language code, falling back to the raw code for
/// anything that is not an ISO 639 code
pub fn language_label(code: &str) -> String {
    match get_language_name(code) {
        Ok(name) => format!("{} ({})", name, code),
        Err(_) => code.to_string(),
    }
}

/// Split a language pair of the form `"l1-l2"`.
///
/// Returns `None` unless there are exactly two non-empty parts.
pub fn parse_language_pair(pair: &str) -> Option<(String, String)> {
    let mut parts = pair.trim().split('-');
    let first = parts.next()?.trim();
    let second = parts.next()?.trim();

    if parts.next().is_some() || first.is_empty() || second.is_empty() {
        return None;
    }

    Some((first.to_string(), second.to_string()))
}
