//! Change detection by modification time and size

use std::path::Path;
use std::time::SystemTime;
use tokio::fs;
use treemirror_types::{Error, Result};

/// Modification time and size of a file, read on demand and never cached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileSnapshot {
    /// Last modification time
    pub modified: SystemTime,
    /// Size in bytes
    pub size: u64,
}

impl FileSnapshot {
    /// Build a snapshot from already fetched metadata
    pub fn from_metadata(metadata: &std::fs::Metadata) -> std::io::Result<Self> {
        Ok(Self {
            modified: metadata.modified()?,
            size: metadata.len(),
        })
    }

    /// Stat `path` and take a snapshot
    pub async fn read<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let metadata = fs::metadata(path).await?;
        Self::from_metadata(&metadata)
    }

    /// Whether two snapshots describe different files
    ///
    /// Timestamps must be exactly equal; there is no tolerance window.
    pub fn differs_from(&self, other: &Self) -> bool {
        self.modified != other.modified || self.size != other.size
    }
}

/// Decides whether a source file must be copied over its destination
///
/// Content is never compared: two files with the same size and modification
/// time are considered identical.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangeDetector;

impl ChangeDetector {
    /// Create a new change detector
    pub fn new() -> Self {
        Self
    }

    /// Whether `source` must be copied to `destination`
    ///
    /// A destination that does not exist or cannot be stat'ed always needs a
    /// copy. Failing to stat the source is an error.
    pub async fn needs_copy(&self, source: &Path, destination: &Path) -> Result<bool> {
        let source_snapshot = FileSnapshot::read(source)
            .await
            .map_err(|e| Error::io("read metadata of", source, &e))?;

        match FileSnapshot::read(destination).await {
            Ok(destination_snapshot) => Ok(source_snapshot.differs_from(&destination_snapshot)),
            Err(_) => Ok(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::{set_file_mtime, FileTime};
    use std::time::Duration;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_destination_needs_copy() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("a.txt");
        fs::write(&source, b"hello").await.unwrap();

        let detector = ChangeDetector::new();
        assert!(detector
            .needs_copy(&source, &temp_dir.path().join("missing.txt"))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_missing_source_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = ChangeDetector::new()
            .needs_copy(&temp_dir.path().join("nope"), &temp_dir.path().join("dest"))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_same_size_and_mtime_is_unchanged_even_with_different_content() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("src.txt");
        let destination = temp_dir.path().join("dst.txt");
        fs::write(&source, b"aaaa").await.unwrap();
        fs::write(&destination, b"bbbb").await.unwrap();

        let stamp = FileTime::from_unix_time(1_600_000_000, 0);
        set_file_mtime(&source, stamp).unwrap();
        set_file_mtime(&destination, stamp).unwrap();

        assert!(!ChangeDetector::new()
            .needs_copy(&source, &destination)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_mtime_difference_needs_copy() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("src.txt");
        let destination = temp_dir.path().join("dst.txt");
        fs::write(&source, b"same").await.unwrap();
        fs::write(&destination, b"same").await.unwrap();

        set_file_mtime(&source, FileTime::from_unix_time(1_600_000_000, 0)).unwrap();
        set_file_mtime(&destination, FileTime::from_unix_time(1_600_000_001, 0)).unwrap();

        assert!(ChangeDetector::new()
            .needs_copy(&source, &destination)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_size_difference_needs_copy() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("src.txt");
        let destination = temp_dir.path().join("dst.txt");
        fs::write(&source, b"longer content").await.unwrap();
        fs::write(&destination, b"short").await.unwrap();

        let stamp = FileTime::from_unix_time(1_600_000_000, 0);
        set_file_mtime(&source, stamp).unwrap();
        set_file_mtime(&destination, stamp).unwrap();

        assert!(ChangeDetector::new()
            .needs_copy(&source, &destination)
            .await
            .unwrap());
    }

    #[test]
    fn test_snapshot_exact_timestamp_comparison() {
        let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        let a = FileSnapshot {
            modified: base,
            size: 10,
        };
        let b = FileSnapshot {
            modified: base + Duration::from_nanos(1),
            size: 10,
        };

        assert!(!a.differs_from(&a));
        assert!(a.differs_from(&b));
    }
}
