//! scrub-core - Core library for comment-scrub
//!
//! This crate provides the core logic for retroactively scrubbing a user's
//! comment history: the comment model, run configuration, the platform
//! capability trait, and the processor that classifies and mutates comments.

pub mod error;
pub mod types;
pub mod config;
pub mod comment;
pub mod platform;
pub mod scrub;

pub use error::{Result, ScrubError};
pub use types::*;
