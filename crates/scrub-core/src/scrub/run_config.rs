//! Per-run configuration

use crate::config::ScrubDefaults;
use crate::error::{Result, ScrubError};
use serde::{Deserialize, Serialize};

/// Settings for a single scrubbing pass. Immutable once the run starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    replacement_text: String,
    age_threshold_days: u32,
    delete_after_edit: bool,
    dry_run: bool,
}

impl RunConfig {
    /// Create a config with deletion enabled and dry run on
    pub fn new(replacement_text: impl Into<String>, age_threshold_days: u32) -> Result<Self> {
        let replacement_text = replacement_text.into();
        if replacement_text.trim().is_empty() {
            return Err(ScrubError::Validation(
                "replacement text cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            replacement_text,
            age_threshold_days,
            delete_after_edit: true,
            dry_run: true,
        })
    }

    /// Build from the `[scrub]` config section
    pub fn from_defaults(defaults: &ScrubDefaults) -> Result<Self> {
        Ok(Self::new(
            defaults.replacement_text.clone(),
            defaults.age_threshold_days,
        )?
        .delete_after_edit(defaults.delete_after_edit)
        .dry_run(defaults.dry_run))
    }

    pub fn delete_after_edit(mut self, delete: bool) -> Self {
        self.delete_after_edit = delete;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn replacement_text(&self) -> &str {
        &self.replacement_text
    }

    pub fn age_threshold_days(&self) -> u32 {
        self.age_threshold_days
    }

    pub fn deletes_after_edit(&self) -> bool {
        self.delete_after_edit
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}
