//! Result data returned by a sync

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Counters produced once per sync invocation
///
/// Only copy exclusions are counted as `skipped`; files kept because of a
/// delete exclusion do not appear in any counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SyncResult {
    /// Files copied from source to destination
    pub copied: u64,
    /// Destination files removed because they are absent from the source
    pub deleted: u64,
    /// Source files left alone because they matched a copy exclusion
    pub skipped: u64,
}

impl SyncResult {
    /// Create an all-zero result
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the sync changed nothing in the destination
    pub fn is_noop(&self) -> bool {
        self.copied == 0 && self.deleted == 0
    }
}

impl fmt::Display for SyncResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} copied, {} deleted, {} skipped",
            self.copied, self.deleted, self.skipped
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let result = SyncResult {
            copied: 2,
            deleted: 1,
            skipped: 3,
        };
        assert_eq!(result.to_string(), "2 copied, 1 deleted, 3 skipped");
        assert!(!result.is_noop());
    }

    #[test]
    fn test_skips_alone_are_noop() {
        let result = SyncResult {
            skipped: 4,
            ..SyncResult::new()
        };
        assert!(result.is_noop());
    }
}
