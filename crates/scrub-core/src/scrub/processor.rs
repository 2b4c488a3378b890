//! Comment processor: the scrubbing state machine

use super::classify::{classify, Classification, Outcome};
use super::interrupt::InterruptFlag;
use super::observer::ScrubObserver;
use super::run_config::RunConfig;
use super::stats::{RunStats, RunSummary};
use super::throttle::Throttle;
use crate::comment::Comment;
use crate::error::Result;
use crate::platform::CommentPlatform;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

/// Walks a user's comments oldest first and scrubs the ones past the threshold
pub struct CommentProcessor<P> {
    platform: P,
    config: RunConfig,
    throttle: Throttle,
    interrupt: InterruptFlag,
    now: Option<DateTime<Utc>>,
}

impl<P: CommentPlatform> CommentProcessor<P> {
    /// Create a processor with the default one-second throttle
    pub fn new(platform: P, config: RunConfig) -> Self {
        Self {
            platform,
            config,
            throttle: Throttle::default(),
            interrupt: InterruptFlag::new(),
            now: None,
        }
    }

    pub fn with_throttle(mut self, throttle: Throttle) -> Self {
        self.throttle = throttle;
        self
    }

    pub fn with_interrupt(mut self, interrupt: InterruptFlag) -> Self {
        self.interrupt = interrupt;
        self
    }

    /// Fix the reference time used for age computation
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Fetch the authenticated user's comments and process them.
    ///
    /// Only a failure to fetch the listing is returned as an error; failures
    /// on individual comments are counted in the summary.
    pub fn run(&self, observer: &mut dyn ScrubObserver) -> Result<RunSummary> {
        let identity = self.platform.identity().clone();
        info!("Fetching comments for {}", identity);

        let comments = self
            .platform
            .list_comments(&identity)
            .map_err(|e| e.with_context(format!("Failed to fetch comments for {}", identity)))?;

        Ok(self.process(comments, observer))
    }

    /// Process an already fetched listing
    pub fn process(&self, comments: Vec<Comment>, observer: &mut dyn ScrubObserver) -> RunSummary {
        let now = self.now.unwrap_or_else(Utc::now);
        let comments = order_oldest_first(comments);
        let total_fetched = comments.len();

        info!(
            "Processing {} comments (dry_run={}, threshold={}d)",
            total_fetched,
            self.config.is_dry_run(),
            self.config.age_threshold_days()
        );
        observer.on_fetched(total_fetched);

        let mut stats = RunStats::default();
        let mut interrupted = false;

        for comment in &comments {
            if self.interrupt.is_triggered() {
                info!("Interrupted after {} comments", stats.considered());
                interrupted = true;
                observer.on_interrupted(stats.considered());
                break;
            }

            match self.process_one(comment, now) {
                Ok(outcome) => {
                    debug!("{}: {}", comment.id, outcome);
                    stats.record(&outcome);
                    observer.on_comment(comment, &outcome);
                }
                Err(err) => {
                    warn!("Error processing comment {}: {}", comment.id, err);
                    stats.record_failure();
                    observer.on_failure(comment, &err);
                }
            }
        }

        RunSummary {
            total_fetched,
            stats,
            dry_run: self.config.is_dry_run(),
            interrupted,
        }
    }

    /// Classify one comment and apply the configured action
    fn process_one(&self, comment: &Comment, now: DateTime<Utc>) -> Result<Outcome> {
        let dry_run = self.config.is_dry_run();

        match classify(comment, &self.config, now) {
            Classification::ScrubbedCleanup => {
                if dry_run {
                    return Ok(Outcome::WouldCleanUp);
                }
                self.delete(comment)?;
                Ok(Outcome::CleanedUp)
            }
            Classification::TooRecent { age_days } => Ok(Outcome::Skipped { age_days }),
            Classification::Qualified { age_days } => {
                let delete = self.config.deletes_after_edit();
                if dry_run {
                    return Ok(Outcome::WouldEdit { age_days, delete });
                }

                self.throttle
                    .call("edit", || {
                        self.platform
                            .edit(&comment.id, self.config.replacement_text())
                    })
                    .map_err(|e| e.with_context(format!("edit of {}", comment.id)))?;

                if delete {
                    self.delete(comment)?;
                    Ok(Outcome::EditedAndDeleted { age_days })
                } else {
                    Ok(Outcome::Edited { age_days })
                }
            }
        }
    }

    fn delete(&self, comment: &Comment) -> Result<()> {
        self.throttle
            .call("delete", || self.platform.delete(&comment.id))
            .map_err(|e| e.with_context(format!("delete of {}", comment.id)))
    }
}

/// Reverse the newest-first listing, then stable-sort by creation time so the
/// order holds even for sources that are not strictly newest first.
fn order_oldest_first(mut comments: Vec<Comment>) -> Vec<Comment> {
    comments.reverse();
    comments.sort_by_key(|c| c.created_at);
    comments
}
