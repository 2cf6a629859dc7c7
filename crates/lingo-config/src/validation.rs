//! Validation utilities and regex patterns

use regex::Regex;
use std::sync::LazyLock;
use validator::ValidationError;

/// Loose shape of a language tag: `language[-script][-region][-variant...]`.
pub static LOCALE_TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)[a-z]{2,3}(-[a-z]{4})?(-([a-z]{2}|[0-9]{3}))?(-([a-z0-9]{5,8}|[0-9][a-z0-9]{3}))*$")
        .expect("Invalid locale tag regex pattern")
});

/// Validate a language tag used in configuration
pub fn validate_locale_tag(tag: &str) -> Result<(), ValidationError> {
    if tag.is_empty() {
        return Err(ValidationError::new("empty_locale_tag"));
    }
    if LOCALE_TAG_REGEX.is_match(tag) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_locale_tag"))
    }
}

/// Validate a tracing level name
pub fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    match level {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ValidationError::new("invalid_log_level")),
    }
}

/// Validate file path (basic check for valid path characters)
pub fn validate_file_path(path: &str) -> Result<(), ValidationError> {
    if path.is_empty() {
        return Err(ValidationError::new("empty_file_path"));
    }

    // Colon stays allowed for Windows drive letters
    let invalid_chars = ['<', '>', '"', '|', '?', '*'];
    if path.chars().any(|c| invalid_chars.contains(&c)) {
        return Err(ValidationError::new("invalid_file_path_characters"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_tag_regex() {
        for tag in ["en", "en-US", "sr-Cyrl-RS", "es-419", "de-DE-1996", "fil", "zh-Hant"] {
            assert!(validate_locale_tag(tag).is_ok(), "{tag} should be valid");
        }

        for tag in ["", "e", "english", "en_US", "en-", "-US", "en US"] {
            assert!(validate_locale_tag(tag).is_err(), "{tag:?} should be invalid");
        }
    }

    #[test]
    fn test_validate_log_level() {
        for level in ["trace", "debug", "info", "warn", "error"] {
            assert!(validate_log_level(level).is_ok());
        }
        assert!(validate_log_level("verbose").is_err());
        assert!(validate_log_level("INFO").is_err());
    }

    #[test]
    fn test_validate_file_path() {
        assert!(validate_file_path("/var/log/lingo.log").is_ok());
        assert!(validate_file_path("C:\\logs\\lingo.log").is_ok());

        assert!(validate_file_path("").is_err());
        assert!(validate_file_path("lingo|log").is_err());
        assert!(validate_file_path("lingo?.log").is_err());
    }
}
