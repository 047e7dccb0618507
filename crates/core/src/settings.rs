//! User preference enums and profile text limits.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maximum bio length, in characters.
pub const MAX_BIO_LEN: usize = 500;

/// Maximum first/last name length, in characters.
pub const MAX_NAME_LEN: usize = 100;

/// Grade notation the user prefers to see.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeSystem {
    #[default]
    Font,
    VScale,
}

/// Distance units for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

/// Colour theme preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemePreference {
    Light,
    Dark,
    #[default]
    System,
}

macro_rules! impl_db_str {
    ($ty:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        impl $ty {
            /// Convert to a database-compatible string.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }

            /// Parse a stored value, falling back to the default for unknown values.
            pub fn from_str_db(s: &str) -> Self {
                match s {
                    $($s => Self::$variant,)+
                    _ => Self::default(),
                }
            }
        }
    };
}

impl_db_str!(GradeSystem { Font => "font", VScale => "v_scale" });
impl_db_str!(Units { Metric => "metric", Imperial => "imperial" });
impl_db_str!(ThemePreference { Light => "light", Dark => "dark", System => "system" });

/// Truncate `s` to at most `max` characters without splitting a character.
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Trim and truncate an optional free-text profile field.
pub fn clean_text(raw: Option<&str>, max: usize) -> Option<String> {
    raw.map(|s| truncate_chars(s.trim(), max))
}

/// Normalize a gender value: empty clears it, otherwise `male` or `female`.
pub fn parse_gender(raw: &str) -> Result<Option<String>, CoreError> {
    match raw.trim().to_lowercase().as_str() {
        "" => Ok(None),
        g @ ("male" | "female") => Ok(Some(g.to_string())),
        _ => Err(CoreError::Validation("Gender must be male or female".into())),
    }
}

/// Reject a default-location string that is blank after trimming but non-empty.
pub fn validate_default_location(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() && !raw.is_empty() {
        return Err(CoreError::Validation("Default location cannot be blank".into()));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_counts_characters() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(clean_text(Some("  x  "), 10), Some("x".into()));
        assert_eq!(clean_text(None, 10), None);
    }

    #[test]
    fn bio_limit_applies() {
        let long = "a".repeat(MAX_BIO_LEN + 20);
        assert_eq!(clean_text(Some(&long), MAX_BIO_LEN).unwrap().len(), MAX_BIO_LEN);
    }

    #[test]
    fn unknown_db_values_fall_back_to_defaults() {
        assert_eq!(GradeSystem::from_str_db("yds"), GradeSystem::Font);
        assert_eq!(Units::from_str_db("imperial"), Units::Imperial);
        assert_eq!(ThemePreference::from_str_db(""), ThemePreference::System);
    }

    #[test]
    fn enums_use_snake_case_on_the_wire() {
        assert_eq!(serde_json::to_string(&GradeSystem::VScale).unwrap(), "\"v_scale\"");
        assert!(serde_json::from_str::<Units>("\"furlongs\"").is_err());
    }

    #[test]
    fn gender_values() {
        assert_eq!(parse_gender(" Female ").unwrap(), Some("female".into()));
        assert_eq!(parse_gender("").unwrap(), None);
        assert!(parse_gender("other").is_err());
    }

    #[test]
    fn blank_default_location_is_rejected() {
        assert!(validate_default_location("   ").is_err());
        assert_eq!(validate_default_location("").unwrap(), "");
        assert_eq!(validate_default_location(" Bleau ").unwrap(), "Bleau");
    }
}
