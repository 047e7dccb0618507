//! Leaderboard filters and pagination arithmetic.

use serde::Serialize;

use crate::error::CoreError;

/// Page size when the caller does not specify one.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Largest accepted page size.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Ascents older than this many days do not count towards the leaderboard.
pub const LEADERBOARD_WINDOW_DAYS: i32 = 60;

/// Gender filter accepted by the leaderboard endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenderFilter {
    All,
    Male,
    Female,
}

impl GenderFilter {
    /// Parse the `gender` query value. A missing value means [`GenderFilter::All`].
    pub fn parse(raw: Option<&str>) -> Result<Self, CoreError> {
        match raw.map(str::trim) {
            None | Some("") | Some("all") => Ok(Self::All),
            Some("male") => Ok(Self::Male),
            Some("female") => Ok(Self::Female),
            Some(_) => Err(CoreError::Validation("Invalid gender filter".into())),
        }
    }

    /// Value passed to the stored procedure (`NULL` for no filter).
    pub fn as_db_param(self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::Male => Some("male"),
            Self::Female => Some("female"),
        }
    }
}

/// Normalize a `country` query value: `None`, empty and `all` disable the filter.
pub fn country_filter(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"))
        .map(str::to_string)
}

/// A clamped page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Clamp raw query values: `page >= 1`, `limit` in `1..=100`.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Rows to skip before this page.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// 1-based rank of the row at `index` within this page.
    pub fn rank(&self, index: usize) -> i64 {
        let index = i64::try_from(index).unwrap_or(i64::MAX);
        self.offset().saturating_add(index).saturating_add(1)
    }

    /// `ceil(total / limit)`; zero when there are no rows.
    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            return 0;
        }
        (total + self.limit - 1) / self.limit
    }

    /// Pagination block for the response body.
    pub fn summary(&self, total: i64) -> Pagination {
        Pagination {
            page: self.page,
            limit: self.limit,
            total_users: total.max(0),
            total_pages: self.total_pages(total),
        }
    }
}

/// Pagination metadata returned with a leaderboard page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total_users: i64,
    pub total_pages: i64,
}
