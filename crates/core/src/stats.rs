//! Logbook statistics: recent hardest ascents, monthly history and the grade pyramid.

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::grades::{self, DEFAULT_GRADE, FLASH_BONUS, GRADE_COUNT, GRADE_TABLE};
use crate::types::{DbId, Timestamp};

/// Window for the hardest-ascents list and the two-month average.
pub const RECENT_WINDOW_DAYS: i64 = 60;

/// Window for the grade pyramid.
pub const PYRAMID_WINDOW_DAYS: i64 = 365;

/// Months shown in the grade history, including the current one.
pub const HISTORY_MONTHS: u32 = 12;

/// Number of ascents in the hardest-ascents list.
pub const TOP_ASCENTS: usize = 10;

/// Outcome of an attempt on a climb.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogStatus {
    Flash,
    #[default]
    Top,
    Try,
}

impl LogStatus {
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "flash" => Ok(Self::Flash),
            "top" => Ok(Self::Top),
            "try" => Ok(Self::Try),
            _ => Err(CoreError::Validation(format!(
                "Invalid status '{s}'. Must be one of: flash, top, try"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flash => "flash",
            Self::Top => "top",
            Self::Try => "try",
        }
    }

    /// Flashes and tops are completed ascents; tries are not.
    pub fn is_send(self) -> bool {
        !matches!(self, Self::Try)
    }
}

/// One logbook entry, joined with its climb's grade.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggedAscent {
    pub log_id: DbId,
    pub climb_id: DbId,
    pub climb_name: Option<String>,
    pub grade: Option<String>,
    pub status: LogStatus,
    pub created_at: Timestamp,
}

impl LoggedAscent {
    /// Points scored by this ascent; unknown grades count as the default grade.
    pub fn points(&self) -> i32 {
        let grade = self.grade.as_deref().unwrap_or(DEFAULT_GRADE);
        let base = grades::grade_points(grade)
            .or_else(|| grades::grade_points(DEFAULT_GRADE))
            .unwrap_or(0);
        match self.status {
            LogStatus::Flash => base + FLASH_BONUS,
            _ => base,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredAscent {
    pub log_id: DbId,
    pub climb_id: DbId,
    pub climb_name: Option<String>,
    pub grade: Option<String>,
    pub status: LogStatus,
    pub points: i32,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthPoints {
    /// Label such as `"Mar 26"`.
    pub month: String,
    pub top: i64,
    pub flash: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PyramidLevel {
    pub grade: &'static str,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogbookStats {
    pub top_10_hardest: Vec<ScoredAscent>,
    pub two_month_average: f64,
    pub average_grade: &'static str,
    pub grade_history: Vec<MonthPoints>,
    pub grade_pyramid: Vec<PyramidLevel>,
    pub lowest_grade: &'static str,
    pub total_climbs: i64,
    pub total_flashes: i64,
    pub total_tops: i64,
    pub total_tries: i64,
}

/// Compute logbook statistics as of `now`.
///
/// Only sends (flash/top) count towards points, history and the pyramid;
/// tries only appear in the totals.
pub fn compute_stats(logs: &[LoggedAscent], now: Timestamp) -> LogbookStats {
    let recent_cutoff = now - Duration::days(RECENT_WINDOW_DAYS);
    let pyramid_cutoff = now - Duration::days(PYRAMID_WINDOW_DAYS);

    let mut recent: Vec<ScoredAscent> = logs
        .iter()
        .filter(|log| log.status.is_send() && log.created_at >= recent_cutoff)
        .map(|log| ScoredAscent {
            log_id: log.log_id,
            climb_id: log.climb_id,
            climb_name: log.climb_name.clone(),
            grade: log.grade.clone(),
            status: log.status,
            points: log.points(),
            created_at: log.created_at,
        })
        .collect();
    // Hardest first; newer ascents win ties.
    recent.sort_by(|a, b| b.points.cmp(&a.points).then(b.created_at.cmp(&a.created_at)));
    recent.truncate(TOP_ASCENTS);

    let two_month_average = if recent.is_empty() {
        0.0
    } else {
        recent.iter().map(|a| f64::from(a.points)).sum::<f64>() / recent.len() as f64
    };
    let average_grade = if recent.is_empty() {
        DEFAULT_GRADE
    } else {
        grades::grade_from_points(two_month_average)
    };

    let grade_history = monthly_history(logs, now.date_naive());

    let mut counts = [0i64; GRADE_COUNT];
    for log in logs
        .iter()
        .filter(|log| log.status.is_send() && log.created_at >= pyramid_cutoff)
    {
        if let Some(idx) = log.grade.as_deref().and_then(grades::grade_index) {
            counts[idx] += 1;
        }
    }
    let grade_pyramid: Vec<PyramidLevel> = GRADE_TABLE
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|((grade, _), count)| PyramidLevel {
            grade: *grade,
            count,
        })
        .collect();
    let lowest_grade = grade_pyramid.first().map_or(DEFAULT_GRADE, |l| l.grade);

    let count_status = |status: LogStatus| logs.iter().filter(|l| l.status == status).count() as i64;

    LogbookStats {
        top_10_hardest: recent,
        two_month_average,
        average_grade,
        grade_history,
        grade_pyramid,
        lowest_grade,
        total_climbs: logs.len() as i64,
        total_flashes: count_status(LogStatus::Flash),
        total_tops: count_status(LogStatus::Top),
        total_tries: count_status(LogStatus::Try),
    }
}

/// Point sums per calendar month, oldest first, ending with the month of `today`.
fn monthly_history(logs: &[LoggedAscent], today: NaiveDate) -> Vec<MonthPoints> {
    let current_month = today.with_day(1).unwrap_or(today);

    let mut months: Vec<(NaiveDate, MonthPoints)> = (0..HISTORY_MONTHS)
        .rev()
        .filter_map(|back| current_month.checked_sub_months(Months::new(back)))
        .map(|start| {
            let label = start.format("%b %y").to_string();
            (
                start,
                MonthPoints {
                    month: label,
                    top: 0,
                    flash: 0,
                },
            )
        })
        .collect();

    for log in logs.iter().filter(|l| l.status.is_send()) {
        let date = log.created_at.date_naive();
        let Some((_, bucket)) = months
            .iter_mut()
            .find(|(start, _)| start.year() == date.year() && start.month() == date.month())
        else {
            continue;
        };
        let points = i64::from(log.points());
        match log.status {
            LogStatus::Flash => bucket.flash += points,
            _ => bucket.top += points,
        }
    }

    months.into_iter().map(|(_, m)| m).collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn now() -> Timestamp {
        chrono::Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap()
    }

    fn ascent(grade: &str, status: LogStatus, days_ago: i64) -> LoggedAscent {
        LoggedAscent {
            log_id: DbId::new_v4(),
            climb_id: DbId::new_v4(),
            climb_name: Some(format!("Problem {grade}")),
            grade: Some(grade.to_string()),
            status,
            created_at: now() - Duration::days(days_ago),
        }
    }

    #[test]
    fn empty_logbook() {
        let stats = compute_stats(&[], now());
        assert!(stats.top_10_hardest.is_empty());
        assert_eq!(stats.two_month_average, 0.0);
        assert_eq!(stats.average_grade, "6A");
        assert_eq!(stats.lowest_grade, "6A");
        assert_eq!(stats.grade_history.len(), 12);
        assert!(stats.grade_pyramid.is_empty());
        assert_eq!(stats.total_climbs, 0);
    }

    #[test]
    fn flash_bonus_applies_to_points() {
        assert_eq!(ascent("7A", LogStatus::Flash, 0).points(), 710);
        assert_eq!(ascent("7A", LogStatus::Top, 0).points(), 700);
        let mut unknown = ascent("7A", LogStatus::Top, 0);
        unknown.grade = None;
        assert_eq!(unknown.points(), 600);
    }

    #[test]
    fn top_ten_uses_recent_sends_only() {
        let mut logs: Vec<_> = (0..12).map(|i| ascent("6B", LogStatus::Top, i)).collect();
        logs.push(ascent("8A", LogStatus::Top, 61));
        logs.push(ascent("8A", LogStatus::Try, 1));
        logs.push(ascent("7A", LogStatus::Flash, 3));

        let stats = compute_stats(&logs, now());
        assert_eq!(stats.top_10_hardest.len(), 10);
        assert_eq!(stats.top_10_hardest[0].points, 710);
        assert!(stats.top_10_hardest.iter().all(|a| a.status != LogStatus::Try));

        let expected = (710.0 + 9.0 * 633.0) / 10.0;
        assert!((stats.two_month_average - expected).abs() < 1e-9);
        assert_eq!(stats.average_grade, grades::grade_from_points(expected));
    }

    #[test]
    fn history_is_chronological_and_labelled() {
        let logs = vec![
            ascent("6A", LogStatus::Top, 0),
            ascent("6A", LogStatus::Flash, 0),
            ascent("7A", LogStatus::Top, 40),
            ascent("7A", LogStatus::Top, 400),
        ];
        let stats = compute_stats(&logs, now());
        let history = &stats.grade_history;
        assert_eq!(history.len(), 12);
        assert_eq!(history[0].month, "Apr 25");
        assert_eq!(history[11].month, "Mar 26");
        assert_eq!(history[11].top, 600);
        assert_eq!(history[11].flash, 610);
        // 40 days before 15 Mar is 4 Feb.
        assert_eq!(history[10].month, "Feb 26");
        assert_eq!(history[10].top, 700);
        let total: i64 = history.iter().map(|m| m.top + m.flash).sum();
        assert_eq!(total, 1910);
    }

    #[test]
    fn pyramid_is_in_table_order_within_a_year() {
        let logs = vec![
            ascent("7A", LogStatus::Top, 10),
            ascent("6B+", LogStatus::Top, 20),
            ascent("7A", LogStatus::Flash, 30),
            ascent("5C", LogStatus::Top, 366),
            ascent("5A", LogStatus::Try, 5),
        ];
        let stats = compute_stats(&logs, now());
        assert_eq!(
            stats.grade_pyramid,
            vec![
                PyramidLevel { grade: "6B+", count: 1 },
                PyramidLevel { grade: "7A", count: 2 },
            ]
        );
        assert_eq!(stats.lowest_grade, "6B+");
    }

    #[test]
    fn totals_count_every_status() {
        let logs = vec![
            ascent("6A", LogStatus::Flash, 500),
            ascent("6A", LogStatus::Top, 1),
            ascent("6A", LogStatus::Try, 1),
            ascent("6A", LogStatus::Try, 2),
        ];
        let stats = compute_stats(&logs, now());
        assert_eq!(stats.total_climbs, 4);
        assert_eq!(stats.total_flashes, 1);
        assert_eq!(stats.total_tops, 1);
        assert_eq!(stats.total_tries, 2);
    }

    #[test]
    fn status_parsing() {
        assert_eq!(LogStatus::from_str_db("flash").unwrap(), LogStatus::Flash);
        assert!(LogStatus::from_str_db("onsight").is_err());
        assert_eq!(LogStatus::default().as_str(), "top");
    }
}
