//! Comment data models

use crate::types::CommentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of characters shown when previewing a comment body
pub const PREVIEW_CHARS: usize = 50;

/// A comment authored by the authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Platform identifier
    pub id: CommentId,
    /// Current text content
    pub body: String,
    /// When the comment was posted
    pub created_at: DateTime<Utc>,
    /// Sub-community the comment belongs to
    pub forum: String,
}

impl Comment {
    /// Create a comment
    pub fn new(
        id: impl Into<CommentId>,
        body: impl Into<String>,
        created_at: DateTime<Utc>,
        forum: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            body: body.into(),
            created_at,
            forum: forum.into(),
        }
    }

    /// Age in whole days relative to `now`, truncated toward zero
    pub fn age_days(&self, now: DateTime<Utc>) -> i64 {
        now.signed_duration_since(self.created_at).num_days()
    }

    /// Whether the body is exactly the replacement text
    pub fn is_scrubbed_with(&self, replacement_text: &str) -> bool {
        self.body == replacement_text
    }

    /// First characters of the body, on a char boundary
    pub fn preview(&self) -> String {
        let mut preview: String = self.body.chars().take(PREVIEW_CHARS).collect();
        if self.body.chars().count() > PREVIEW_CHARS {
            preview.push_str("...");
        }
        preview
    }
}
