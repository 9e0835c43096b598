//! Engine configuration
//!
//! [`SyncConfiguration`] is created once, handed to the engine at construction
//! and never mutated afterwards.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Options recognized by the synchronization engine
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SyncConfiguration {
    /// Patterns whose matching source files are never copied (counted as skipped)
    pub copy_exclusions: Vec<String>,
    /// Patterns whose matching destination-only files are never deleted
    pub delete_exclusions: Vec<String>,
    /// Emit one human-readable line per action to the engine's log sink
    pub verbose_logging: bool,
    /// Report what would change without touching the destination
    pub dry_run: bool,
}

impl SyncConfiguration {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Add copy-exclusion patterns
    pub fn with_copy_exclusions<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.copy_exclusions
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Add delete-exclusion patterns
    pub fn with_delete_exclusions<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.delete_exclusions
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Enable or disable per-action log lines
    pub fn verbose(mut self, enabled: bool) -> Self {
        self.verbose_logging = enabled;
        self
    }

    /// Enable or disable dry-run mode
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }
}
