//! Crag and region field rules.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Search terms shorter than this return no results.
pub const MIN_SEARCH_QUERY_LEN: usize = 2;

/// Maximum number of crags returned by a name search.
pub const CRAG_SEARCH_LIMIT: i64 = 30;

/// Kind of climbing found at a crag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CragType {
    #[default]
    Sport,
    Boulder,
    Trad,
    Mixed,
}

impl CragType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sport => "sport",
            Self::Boulder => "boulder",
            Self::Trad => "trad",
            Self::Mixed => "mixed",
        }
    }
}

/// Trim a required name field; `field` names it in the error message.
pub fn require_name(raw: Option<&str>, field: &str) -> Result<String, CoreError> {
    raw.map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .ok_or_else(|| CoreError::Validation(format!("{field} is required")))
}

/// Upper-case and truncate a country code to its first two characters.
pub fn normalize_country_code(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|c| !c.is_empty())
        .map(|c| c.to_uppercase().chars().take(2).collect())
}

/// A trimmed search term, or `None` when it is too short to search with.
pub fn search_term(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|q| q.chars().count() >= MIN_SEARCH_QUERY_LEN)
        .map(str::to_string)
}

/// Escape `%`, `_` and `\` so user input matches literally inside `ILIKE`.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
