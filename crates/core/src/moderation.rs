//! Climb moderation status and crag report rules.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Minimum length of a crag report reason, in characters (after trimming).
pub const MIN_REPORT_REASON_LEN: usize = 10;

/// Moderation status of a submitted climb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClimbStatus {
    Pending,
    Approved,
    Rejected,
}

impl ClimbStatus {
    /// Parse a status string from the database.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(CoreError::Validation(format!(
                "Invalid climb status '{s}'. Must be one of: pending, approved, rejected"
            ))),
        }
    }

    /// Convert to a database-compatible string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Only pending climbs can be decided, and only once.
    pub fn can_transition_to(self, next: ClimbStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Approved) | (Self::Pending, Self::Rejected)
        )
    }
}

/// Check a moderation decision and build the error returned when it is not allowed.
pub fn ensure_transition(current: ClimbStatus, next: ClimbStatus) -> Result<(), CoreError> {
    if current.can_transition_to(next) {
        return Ok(());
    }
    Err(CoreError::Conflict(format!(
        "Climb is already {} and cannot be {}",
        current.as_str(),
        next.as_str()
    )))
}

/// Validate and trim a crag report reason.
pub fn validate_report_reason(reason: &str) -> Result<String, CoreError> {
    let trimmed = reason.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Crag ID and reason are required".into()));
    }
    if trimmed.chars().count() < MIN_REPORT_REASON_LEN {
        return Err(CoreError::Validation(
            "Please provide more detail about why you are reporting this crag".into(),
        ));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn only_pending_climbs_can_be_decided() {
        assert!(ClimbStatus::Pending.can_transition_to(ClimbStatus::Approved));
        assert!(ClimbStatus::Pending.can_transition_to(ClimbStatus::Rejected));
        assert!(!ClimbStatus::Approved.can_transition_to(ClimbStatus::Rejected));
        assert!(!ClimbStatus::Rejected.can_transition_to(ClimbStatus::Approved));
        assert!(!ClimbStatus::Pending.can_transition_to(ClimbStatus::Pending));
    }

    #[test]
    fn rejected_transition_is_a_conflict() {
        assert_matches!(
            ensure_transition(ClimbStatus::Approved, ClimbStatus::Rejected),
            Err(CoreError::Conflict(msg)) if msg.contains("already approved")
        );
    }

    #[test]
    fn status_round_trips_through_db_strings() {
        for status in [ClimbStatus::Pending, ClimbStatus::Approved, ClimbStatus::Rejected] {
            assert_eq!(ClimbStatus::from_str_db(status.as_str()).unwrap(), status);
        }
        assert!(ClimbStatus::from_str_db("discord_pending").is_err());
    }

    #[test]
    fn report_reason_needs_detail() {
        assert!(validate_report_reason("bad").is_err());
        assert!(validate_report_reason("          ").is_err());
        assert_eq!(
            validate_report_reason("  duplicate of Le Gouffre  ").unwrap(),
            "duplicate of Le Gouffre"
        );
    }
}
