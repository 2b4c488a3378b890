//! Comment scrubbing module
//!
//! This module holds the per-run state machine that walks a user's comment
//! history and decides, comment by comment, whether to leave it alone,
//! overwrite it, delete it, or clean up a leftover from an earlier run.
//!
//! # Overview
//!
//! A run consists of:
//! - Fetching every comment through a [`CommentPlatform`](crate::platform::CommentPlatform)
//! - Ordering them oldest first
//! - Classifying and acting on each comment inside its own failure boundary
//! - Aggregating the outcomes into a [`RunSummary`]
//!
//! # Example
//!
//! ```ignore
//! use scrub_core::scrub::{CommentProcessor, NoopObserver, RunConfig};
//!
//! let config = RunConfig::new("F", 30)?.delete_after_edit(true).dry_run(false);
//! let processor = CommentProcessor::new(&client, config);
//! let summary = processor.run(&mut NoopObserver)?;
//! println!("{} edited", summary.stats.edited);
//! ```

mod classify;
mod interrupt;
mod observer;
mod processor;
mod run_config;
mod stats;
mod throttle;

pub use classify::{classify, Classification, Outcome};
pub use interrupt::InterruptFlag;
pub use observer::{NoopObserver, ScrubObserver};
pub use processor::CommentProcessor;
pub use run_config::RunConfig;
pub use stats::{RunStats, RunSummary};
pub use throttle::{Sleeper, ThreadSleeper, Throttle};
