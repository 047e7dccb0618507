//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Clamp `limit` to `1..=max` (default `default`) and `offset` to `>= 0`.
    pub fn clamped(&self, default: i64, max: i64) -> (i64, i64) {
        (
            self.limit.unwrap_or(default).clamp(1, max),
            self.offset.unwrap_or(0).max(0),
        )
    }
}

/// `?q=` search parameter.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// `?lat=&lng=` as raw strings so malformed numbers produce a 400 with a
/// readable message rather than an extractor rejection.
#[derive(Debug, Deserialize)]
pub struct CoordinateParams {
    pub lat: Option<String>,
    pub lng: Option<String>,
}
