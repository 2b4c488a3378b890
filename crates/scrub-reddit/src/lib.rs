//! scrub-reddit - Reddit client for comment-scrub
//!
//! This crate implements the [`CommentPlatform`](scrub_core::platform::CommentPlatform)
//! capability surface against Reddit's OAuth API.
//!
//! ## Features
//!
//! - Script-app password grant with transparent token refresh
//! - Paginated comment listing for the authenticated user
//! - Comment edit and delete
//!
//! ## Usage
//!
//! ```rust,ignore
//! use scrub_core::config::Config;
//! use scrub_reddit::RedditClient;
//!
//! let config = Config::load_or_default(&path)?;
//! let client = RedditClient::authenticate(&config.reddit)?;
//! println!("Logged in as {}", client.identity());
//! ```

pub mod client;
pub mod models;

pub use client::RedditClient;
