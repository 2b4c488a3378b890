//! Run statistics

use super::classify::Outcome;
use serde::{Deserialize, Serialize};

/// Counters accumulated over one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub processed: usize,
    pub edited: usize,
    pub deleted: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Subset of `deleted` that were leftovers from an earlier run
    pub cleaned_up: usize,
}

impl RunStats {
    /// Count a successfully handled comment
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::CleanedUp => {
                self.deleted += 1;
                self.cleaned_up += 1;
                self.processed += 1;
            }
            Outcome::WouldCleanUp | Outcome::WouldEdit { .. } => {
                self.processed += 1;
            }
            Outcome::Skipped { .. } => {
                self.skipped += 1;
            }
            Outcome::Edited { .. } => {
                self.edited += 1;
                self.processed += 1;
            }
            Outcome::EditedAndDeleted { .. } => {
                self.edited += 1;
                self.deleted += 1;
                self.processed += 1;
            }
        }
    }

    /// Count a comment whose handling failed
    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    /// Comments visited so far
    pub fn considered(&self) -> usize {
        self.processed + self.skipped + self.failed
    }

    /// Comments deleted after being edited in this run
    pub fn newly_deleted(&self) -> usize {
        self.deleted - self.cleaned_up
    }
}

/// Result of a run, reported after the loop ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Comments returned by the platform
    pub total_fetched: usize,
    /// Final counters
    pub stats: RunStats,
    /// Whether no mutating call was allowed
    pub dry_run: bool,
    /// Whether the loop stopped early on user request
    pub interrupted: bool,
}

impl RunSummary {
    /// Comments visited before the loop ended
    pub fn considered(&self) -> usize {
        self.stats.considered()
    }

    /// Comments never reached because of an interruption
    pub fn remaining(&self) -> usize {
        self.total_fetched.saturating_sub(self.considered())
    }
}
