//! Username validation and conflict suggestions.

use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;

use crate::error::CoreError;

/// Minimum username length in characters (after trimming).
pub const MIN_USERNAME_LEN: usize = 3;

/// Maximum username length in characters (after trimming).
pub const MAX_USERNAME_LEN: usize = 30;

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("valid username regex"));

/// Validate a requested username and return its trimmed form.
pub fn validate_username(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(CoreError::Validation("Username cannot be empty".into()));
    }

    let len = trimmed.chars().count();
    if !(MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&len) {
        return Err(CoreError::Validation(format!(
            "Username must be between {MIN_USERNAME_LEN} and {MAX_USERNAME_LEN} characters"
        )));
    }

    if !USERNAME_RE.is_match(trimmed) {
        return Err(CoreError::Validation(
            "Username can only contain letters, numbers, underscores, periods, and hyphens".into(),
        ));
    }

    Ok(trimmed.to_string())
}

/// Build alternative usernames after `username` turned out to be taken.
///
/// Always offers `username` with a numeric suffix; when a first name is
/// known, also offers `first.last` (lowercased, trailing dots removed) with a
/// shorter suffix.
pub fn suggest_usernames<R: Rng + ?Sized>(
    username: &str,
    first_name: Option<&str>,
    last_name: Option<&str>,
    rng: &mut R,
) -> Vec<String> {
    let mut suggestions = vec![format!("{username}{}", rng.random_range(0..1000))];

    if let Some(first) = first_name.map(str::trim).filter(|f| !f.is_empty()) {
        let last = last_name.map(str::trim).unwrap_or_default();
        let base = format!("{first}.{last}").to_lowercase();
        let base = base.trim_end_matches('.');
        suggestions.push(format!("{base}{}", rng.random_range(0..100)));
    }

    suggestions
}

/// Up to two uppercase initials for an avatar placeholder.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn accepts_allowed_characters_and_trims() {
        assert_eq!(validate_username("  crimp_king.99-x ").unwrap(), "crimp_king.99-x");
        assert_eq!(validate_username("abc").unwrap(), "abc");
        assert_eq!(validate_username(&"a".repeat(30)).unwrap(), "a".repeat(30));
    }

    #[test]
    fn rejects_lengths_outside_bounds() {
        assert!(validate_username("ab").is_err());
        assert!(validate_username(&"a".repeat(31)).is_err());
        assert!(validate_username("   ").is_err());
        assert!(validate_username("").is_err());
    }

    #[test]
    fn length_bound_applies_after_trimming() {
        assert!(validate_username("  ab  ").is_err());
    }

    #[test]
    fn rejects_disallowed_characters() {
        for bad in ["has space", "émile", "bang!", "at@sign", "slash/y", "tab\tbed"] {
            assert!(validate_username(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn suggestions_without_first_name() {
        let mut rng = StdRng::seed_from_u64(7);
        let suggestions = suggest_usernames("sender", None, None, &mut rng);
        assert_eq!(suggestions.len(), 1);
        assert!(suggestions[0].starts_with("sender"));
        let suffix: u32 = suggestions[0]["sender".len()..].parse().unwrap();
        assert!(suffix < 1000);
    }

    #[test]
    fn suggestions_with_names_are_lowercased() {
        let mut rng = StdRng::seed_from_u64(7);
        let suggestions = suggest_usernames("sender", Some("Ada"), Some("Lovelace"), &mut rng);
        assert_eq!(suggestions.len(), 2);
        assert!(suggestions[1].starts_with("ada.lovelace"));
    }

    #[test]
    fn suggestions_strip_trailing_dot_without_last_name() {
        let mut rng = StdRng::seed_from_u64(1);
        let suggestions = suggest_usernames("sender", Some("Ada"), None, &mut rng);
        let second = &suggestions[1];
        assert!(second.starts_with("ada"));
        assert!(!second.contains('.'));
    }

    #[test]
    fn initials_take_two_words() {
        assert_eq!(initials("ada lovelace byron"), "AL");
        assert_eq!(initials("solo"), "S");
        assert_eq!(initials(""), "");
    }
}
