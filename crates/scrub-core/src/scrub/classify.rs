//! Per-comment classification and outcomes

use super::run_config::RunConfig;
use crate::comment::Comment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the processor decided to do with a comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    /// Body already equals the replacement text; left over from an earlier run
    ScrubbedCleanup,
    /// Not older than the threshold
    TooRecent { age_days: i64 },
    /// Older than the threshold and not yet scrubbed
    Qualified { age_days: i64 },
}

/// Classify a comment. The leftover check wins over the age check.
pub fn classify(comment: &Comment, config: &RunConfig, now: DateTime<Utc>) -> Classification {
    if comment.is_scrubbed_with(config.replacement_text()) {
        return Classification::ScrubbedCleanup;
    }

    let age_days = comment.age_days(now);
    if age_days <= i64::from(config.age_threshold_days()) {
        Classification::TooRecent { age_days }
    } else {
        Classification::Qualified { age_days }
    }
}

/// Terminal state of a successfully handled comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Leftover deleted
    CleanedUp,
    /// Leftover would be deleted (dry run)
    WouldCleanUp,
    /// Too recent, untouched
    Skipped { age_days: i64 },
    /// Overwritten and kept
    Edited { age_days: i64 },
    /// Overwritten, then deleted
    EditedAndDeleted { age_days: i64 },
    /// Would be overwritten, and deleted if `delete` (dry run)
    WouldEdit { age_days: i64, delete: bool },
}

impl Outcome {
    /// Whether the comment was left alone because of its age
    pub fn is_skipped(&self) -> bool {
        matches!(self, Outcome::Skipped { .. })
    }

    /// Whether a mutating call was made for this comment
    pub fn mutated(&self) -> bool {
        matches!(
            self,
            Outcome::CleanedUp | Outcome::Edited { .. } | Outcome::EditedAndDeleted { .. }
        )
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::CleanedUp => write!(f, "deleted previously edited comment"),
            Outcome::WouldCleanUp => write!(f, "would delete previously edited comment"),
            Outcome::Skipped { age_days } => write!(f, "skipped ({} days old)", age_days),
            Outcome::Edited { age_days } => write!(f, "edited ({} days old)", age_days),
            Outcome::EditedAndDeleted { age_days } => {
                write!(f, "edited and deleted ({} days old)", age_days)
            }
            Outcome::WouldEdit { age_days, delete } => write!(
                f,
                "would edit and {} ({} days old)",
                if *delete { "delete" } else { "keep" },
                age_days
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn comment(body: &str, age_days: i64) -> Comment {
        Comment::new("c1", body, now() - Duration::days(age_days), "rust")
    }

    fn config() -> RunConfig {
        RunConfig::new("F", 30).unwrap()
    }

    #[test]
    fn test_scrubbed_wins_regardless_of_age() {
        assert_eq!(
            classify(&comment("F", 0), &config(), now()),
            Classification::ScrubbedCleanup
        );
        assert_eq!(
            classify(&comment("F", 400), &config(), now()),
            Classification::ScrubbedCleanup
        );
    }

    #[test]
    fn test_threshold_boundary_is_too_recent() {
        assert_eq!(
            classify(&comment("hello", 30), &config(), now()),
            Classification::TooRecent { age_days: 30 }
        );
        assert_eq!(
            classify(&comment("hello", 31), &config(), now()),
            Classification::Qualified { age_days: 31 }
        );
    }

    #[test]
    fn test_partial_day_truncated() {
        let c = Comment::new(
            "c1",
            "hello",
            now() - Duration::days(30) - Duration::hours(20),
            "rust",
        );
        assert_eq!(
            classify(&c, &config(), now()),
            Classification::TooRecent { age_days: 30 }
        );
    }

    #[test]
    fn test_zero_threshold() {
        let config = RunConfig::new("F", 0).unwrap();
        assert_eq!(
            classify(&comment("hello", 0), &config, now()),
            Classification::TooRecent { age_days: 0 }
        );
        assert_eq!(
            classify(&comment("hello", 1), &config, now()),
            Classification::Qualified { age_days: 1 }
        );
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(
            Outcome::WouldEdit {
                age_days: 45,
                delete: false
            }
            .to_string(),
            "would edit and keep (45 days old)"
        );
        assert!(Outcome::CleanedUp.mutated());
        assert!(!Outcome::WouldCleanUp.mutated());
        assert!(Outcome::Skipped { age_days: 1 }.is_skipped());
    }
}
