//! Search form input checks.

use skycast_core::ValidationError;

/// Shortest city name the form accepts.
pub const MIN_CITY_LEN: usize = 2;

/// Border colour shown while the input is too short.
pub const WARNING_BORDER: &str = "#f59e0b";

/// Validate a submitted city name.
///
/// Returns the trimmed, lowercased name to search for.
pub fn validate_city_input(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty);
    }
    if trimmed.chars().count() < MIN_CITY_LEN {
        return Err(ValidationError::TooShort { min: MIN_CITY_LEN });
    }
    Ok(trimmed.to_lowercase())
}

/// Live hint while typing: a warning border once something is typed but the
/// name is still too short. Empty input gets no hint.
pub fn input_hint(raw: &str) -> Option<&'static str> {
    let len = raw.trim().chars().count();
    if len > 0 && len < MIN_CITY_LEN {
        Some(WARNING_BORDER)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(validate_city_input(""), Err(ValidationError::Empty));
        assert_eq!(validate_city_input("   "), Err(ValidationError::Empty));
    }

    #[test]
    fn test_single_character() {
        assert_eq!(
            validate_city_input(" a "),
            Err(ValidationError::TooShort { min: 2 })
        );
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        assert_eq!(
            validate_city_input("é"),
            Err(ValidationError::TooShort { min: 2 })
        );
        assert_eq!(validate_city_input("Åre"), Ok("åre".to_string()));
    }

    #[test]
    fn test_valid_input_is_trimmed_and_lowercased() {
        assert_eq!(validate_city_input("  New York "), Ok("new york".to_string()));
        assert_eq!(validate_city_input("LA"), Ok("la".to_string()));
    }

    #[test]
    fn test_input_hint() {
        assert_eq!(input_hint(""), None);
        assert_eq!(input_hint("m"), Some(WARNING_BORDER));
        assert_eq!(input_hint(" m  "), Some(WARNING_BORDER));
        assert_eq!(input_hint("ma"), None);
    }
}
