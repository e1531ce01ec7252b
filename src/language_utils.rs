use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for the documentation site's target languages
///
/// Site language directories use lowercase ISO 639-1 codes, optionally followed
/// by a script or region subtag (`zh-hant`). Names for prompts come from isolang.
/// Target languages the site publishes, in the order they are usually processed
pub const SUPPORTED_LANGUAGES: [&str; 27] = [
    "ar", "cs", "de", "el", "es", "fa", "fr", "he", "hi", "hu", "hy", "id", "it", "ja",
    "ko", "nl", "pl", "pt", "ro", "ru", "sv", "th", "tr", "uk", "vi", "zh", "zh-hant",
];

/// Normalize a site language code (`zh_Hant` -> `zh-hant`)
pub fn normalize_code(code: &str) -> String {
    code.trim().to_lowercase().replace('_', "-")
}

/// Primary language subtag of a site language code (`zh-hant` -> `zh`)
pub fn primary_subtag(code: &str) -> String {
    let normalized = normalize_code(code);
    normalized
        .split('-')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Check whether a code is one of the supported target languages
pub fn is_supported(code: &str) -> bool {
    let normalized = normalize_code(code);
    SUPPORTED_LANGUAGES.contains(&normalized.as_str())
}

/// Validate that the primary subtag is a real ISO 639-1 code
pub fn validate_language_code(code: &str) -> Result<()> {
    let primary = primary_subtag(code);
    if primary.len() == 2 && Language::from_639_1(&primary).is_some() {
        return Ok(());
    }
    Err(anyhow!("Invalid language code: {}", code))
}

/// Get the English language name used in prompts
///
/// Script/region variants the site knows about get a qualified name.
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = normalize_code(code);
    match normalized.as_str() {
        "zh-hant" => return Ok("Chinese (Traditional)".to_string()),
        "zh-hans" => return Ok("Chinese (Simplified)".to_string()),
        "pt-br" => return Ok("Portuguese (Brazil)".to_string()),
        _ => {}
    }

    validate_language_code(&normalized)?;
    let primary = primary_subtag(&normalized);
    let lang = Language::from_639_1(&primary)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", code))?;

    Ok(lang.to_name().to_string())
}

/// Name used in prompts, falling back to the raw code for unknown languages
pub fn display_name(code: &str) -> String {
    get_language_name(code).unwrap_or_else(|_| code.to_string())
}
