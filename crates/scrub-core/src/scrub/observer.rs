//! Progress reporting hooks

use super::classify::Outcome;
use crate::comment::Comment;
use crate::error::ScrubError;

/// Receives progress events from a run. All methods default to no-ops.
pub trait ScrubObserver {
    /// The comment listing has been fetched
    fn on_fetched(&mut self, _total: usize) {}

    /// A comment reached a terminal state
    fn on_comment(&mut self, _comment: &Comment, _outcome: &Outcome) {}

    /// Handling a comment failed; the run continues
    fn on_failure(&mut self, _comment: &Comment, _error: &ScrubError) {}

    /// The loop is stopping early after `visited` comments
    fn on_interrupted(&mut self, _visited: usize) {}
}

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ScrubObserver for NoopObserver {}
