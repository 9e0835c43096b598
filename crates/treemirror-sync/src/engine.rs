//! Main synchronization engine

use crate::{detector::ChangeDetector, pattern::PatternSet, walker::TreeListing, walker::TreeWalker};
use filetime::FileTime;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::fs;
use tracing::{debug, info, warn};
use treemirror_types::{
    Error, LogLevel, LogSink, NoopSink, RelativePath, Result, SyncConfiguration, SyncResult,
};

/// Mirrors a source tree into a destination tree
///
/// A sync runs four strictly sequential phases: discovery of both trees,
/// copying new or changed files, deleting destination files absent from the
/// source, and pruning destination directories left empty.
pub struct SyncEngine {
    config: SyncConfiguration,
    copy_exclusions: PatternSet,
    delete_exclusions: PatternSet,
    walker: TreeWalker,
    detector: ChangeDetector,
    sink: Arc<dyn LogSink>,
}

impl fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SyncEngine {
    /// Create a sync engine that discards per-action log lines
    pub fn new(config: SyncConfiguration) -> Result<Self> {
        Self::with_sink(config, Arc::new(NoopSink))
    }

    /// Create a sync engine reporting per-action lines to `sink`
    ///
    /// The sink only receives messages when `verbose_logging` is enabled.
    pub fn with_sink(config: SyncConfiguration, sink: Arc<dyn LogSink>) -> Result<Self> {
        let copy_exclusions = PatternSet::new(&config.copy_exclusions)?;
        let delete_exclusions = PatternSet::new(&config.delete_exclusions)?;

        Ok(Self {
            config,
            copy_exclusions,
            delete_exclusions,
            walker: TreeWalker::new(),
            detector: ChangeDetector::new(),
            sink,
        })
    }

    /// The configuration this engine was built with
    pub fn config(&self) -> &SyncConfiguration {
        &self.config
    }

    /// Mirror `source` into `destination`
    ///
    /// Fails with [`Error::SourceMissing`] before doing anything if the source
    /// root does not exist. The destination root is created when absent. Any
    /// unexpected I/O error during discovery, copy or delete aborts the sync;
    /// failures while pruning empty directories are logged and ignored.
    pub async fn sync<S, D>(&self, source: S, destination: D) -> Result<SyncResult>
    where
        S: AsRef<Path>,
        D: AsRef<Path>,
    {
        let source = source.as_ref();
        let destination = destination.as_ref();
        let start_time = Instant::now();

        info!(
            "Starting sync: {} -> {}",
            source.display(),
            destination.display()
        );

        self.validate_paths(source, destination).await?;

        let (source_tree, destination_tree) =
            tokio::try_join!(self.walker.walk(source), self.walker.walk(destination))?;

        let mut result = SyncResult::new();
        self.copy_phase(source, destination, &source_tree, &mut result)
            .await?;
        self.delete_phase(destination, &source_tree, &destination_tree, &mut result)
            .await?;

        if self.config.dry_run {
            debug!("Dry run: skipping empty directory cleanup");
        } else {
            self.prune_empty_directories(source, destination).await;
        }

        info!("Sync completed: {} in {:?}", result, start_time.elapsed());
        Ok(result)
    }

    /// Check the source root and create the destination root
    async fn validate_paths(&self, source: &Path, destination: &Path) -> Result<()> {
        let metadata = match fs::metadata(source).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::SourceMissing {
                    path: source.to_path_buf(),
                });
            }
            Err(e) => return Err(Error::io("read metadata of", source, &e)),
        };

        if !metadata.is_dir() {
            return Err(Error::Io {
                message: format!("Source path is not a directory: {}", source.display()),
            });
        }

        if !self.config.dry_run {
            fs::create_dir_all(destination)
                .await
                .map_err(|e| Error::io("create destination directory", destination, &e))?;
        }

        Ok(())
    }

    async fn copy_phase(
        &self,
        source: &Path,
        destination: &Path,
        source_tree: &TreeListing,
        result: &mut SyncResult,
    ) -> Result<()> {
        let mut files: Vec<&RelativePath> = source_tree.files.iter().collect();
        files.sort_unstable();

        for relative in files {
            if let Some(pattern) = self.copy_exclusions.first_match(relative) {
                result.skipped += 1;
                self.report(LogLevel::Info, || {
                    format!("Skipped {} (matches '{}')", relative, pattern)
                });
                continue;
            }

            let source_path = relative.to_path(source);
            let destination_path = relative.to_path(destination);
            if !self
                .detector
                .needs_copy(&source_path, &destination_path)
                .await?
            {
                continue;
            }

            if self.config.dry_run {
                debug!("DRY RUN: Would copy {}", relative);
            } else {
                self.copy_file(destination, &source_path, &destination_path)
                    .await?;
            }
            result.copied += 1;
            self.report(LogLevel::Info, || {
                format!("{} {}", self.action("Copied", "Would copy"), relative)
            });
        }

        info!("Copy phase: {} copied, {} skipped", result.copied, result.skipped);
        Ok(())
    }

    async fn delete_phase(
        &self,
        destination: &Path,
        source_tree: &TreeListing,
        destination_tree: &TreeListing,
        result: &mut SyncResult,
    ) -> Result<()> {
        let mut extra: Vec<&RelativePath> = destination_tree
            .files
            .difference(&source_tree.files)
            .collect();
        extra.sort_unstable();

        for relative in extra {
            // Kept files are not counted anywhere.
            if let Some(pattern) = self.delete_exclusions.first_match(relative) {
                self.report(LogLevel::Debug, || {
                    format!("Kept {} (matches '{}')", relative, pattern)
                });
                continue;
            }

            let path = relative.to_path(destination);
            if self.config.dry_run {
                debug!("DRY RUN: Would delete {}", path.display());
            } else {
                fs::remove_file(&path)
                    .await
                    .map_err(|e| Error::io("delete file", &path, &e))?;
                debug!("Deleted: {}", path.display());
            }
            result.deleted += 1;
            self.report(LogLevel::Info, || {
                format!("{} {}", self.action("Deleted", "Would delete"), relative)
            });
        }

        info!("Delete phase: {} deleted", result.deleted);
        Ok(())
    }

    /// Remove destination directories that are absent from the source and empty
    ///
    /// Deepest directories go first so that parents emptied by the removal of
    /// their children are pruned in the same pass. Never fails.
    async fn prune_empty_directories(&self, source: &Path, destination: &Path) -> usize {
        let listing = match self.walker.walk(destination).await {
            Ok(listing) => listing,
            Err(e) => {
                warn!("Skipping empty directory cleanup: {}", e);
                self.report(LogLevel::Warn, || {
                    format!("Skipping empty directory cleanup: {}", e)
                });
                return 0;
            }
        };

        let mut removed = 0;
        for relative in listing.directories_deepest_first() {
            match Self::remove_if_orphaned_and_empty(source, destination, relative).await {
                Ok(true) => {
                    removed += 1;
                    debug!("Removed empty directory: {}", relative);
                    self.report(LogLevel::Info, || {
                        format!("Removed empty directory {}", relative)
                    });
                }
                Ok(false) => {}
                Err(e) => {
                    debug!("Could not prune {}: {}", relative, e);
                    self.report(LogLevel::Warn, || {
                        format!("Could not remove directory {}: {}", relative, e)
                    });
                }
            }
        }

        if removed > 0 {
            info!("Removed {} empty directories", removed);
        }
        removed
    }

    async fn remove_if_orphaned_and_empty(
        source: &Path,
        destination: &Path,
        relative: &RelativePath,
    ) -> io::Result<bool> {
        let source_path = relative.to_path(source);
        match fs::symlink_metadata(&source_path).await {
            Ok(_) => return Ok(false),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            // A file in the source where the destination has a directory
            // means nothing exists at this path under the source.
            Err(e) => {
                if Self::non_directory_ancestor(source, &source_path)
                    .await
                    .is_none()
                {
                    return Err(e);
                }
            }
        }

        let path = relative.to_path(destination);
        let mut entries = fs::read_dir(&path).await?;
        if entries.next_entry().await?.is_some() {
            return Ok(false);
        }

        fs::remove_dir(&path).await?;
        Ok(true)
    }

    /// Copy one file and stamp the destination with the source's times
    async fn copy_file(
        &self,
        destination_root: &Path,
        source: &Path,
        destination: &Path,
    ) -> Result<()> {
        if let Ok(metadata) = fs::symlink_metadata(destination).await {
            if metadata.is_dir() {
                return Err(Error::TypeMismatch {
                    path: destination.to_path_buf(),
                });
            }
        }

        if let Some(parent) = destination.parent() {
            if let Err(e) = fs::create_dir_all(parent).await {
                return Err(match Self::non_directory_ancestor(destination_root, parent).await {
                    Some(path) => Error::TypeMismatch { path },
                    None => Error::io("create directory", parent, &e),
                });
            }
        }

        fs::copy(source, destination).await.map_err(|e| Error::Io {
            message: format!(
                "Failed to copy '{}' to '{}': {}",
                source.display(),
                destination.display(),
                e
            ),
        })?;

        let metadata = fs::metadata(source)
            .await
            .map_err(|e| Error::io("read metadata of", source, &e))?;
        let modified = FileTime::from_last_modification_time(&metadata);
        let accessed = FileTime::from_last_access_time(&metadata);

        // Access time is best-effort; the modification time is required.
        if filetime::set_file_times(destination, accessed, modified).is_err() {
            filetime::set_file_mtime(destination, modified)
                .map_err(|e| Error::io("set modification time of", destination, &e))?;
        }

        debug!("Copied: {} -> {}", source.display(), destination.display());
        Ok(())
    }

    /// Find the entry below `root` that blocks `directory` from being created
    async fn non_directory_ancestor(root: &Path, directory: &Path) -> Option<PathBuf> {
        for ancestor in directory.ancestors() {
            if ancestor == root || !ancestor.starts_with(root) {
                break;
            }
            if let Ok(metadata) = fs::symlink_metadata(ancestor).await {
                if !metadata.is_dir() {
                    return Some(ancestor.to_path_buf());
                }
            }
        }
        None
    }

    fn action(&self, done: &'static str, planned: &'static str) -> &'static str {
        if self.config.dry_run {
            planned
        } else {
            done
        }
    }

    fn report<F>(&self, level: LogLevel, message: F)
    where
        F: FnOnce() -> String,
    {
        if self.config.verbose_logging {
            self.sink.log(level, &message());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct CollectingSink(Mutex<Vec<String>>);

    impl LogSink for CollectingSink {
        fn log(&self, level: LogLevel, message: &str) {
            self.0.lock().unwrap().push(format!("{level}: {message}"));
        }
    }

    async fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.unwrap();
        }
        fs::write(path, content).await.unwrap();
    }

    #[test]
    fn test_engine_creation() {
        let config = SyncConfiguration::new().with_copy_exclusions(["*.log"]);
        let engine = SyncEngine::new(config.clone()).unwrap();
        assert_eq!(engine.config(), &config);
    }

    #[tokio::test]
    async fn test_missing_source_fails_without_creating_destination() {
        let temp_dir = TempDir::new().unwrap();
        let destination = temp_dir.path().join("dest");

        let engine = SyncEngine::new(SyncConfiguration::default()).unwrap();
        let error = engine
            .sync(temp_dir.path().join("missing"), &destination)
            .await
            .unwrap_err();

        assert!(matches!(error, Error::SourceMissing { .. }));
        assert!(!destination.exists());
    }

    #[tokio::test]
    async fn test_creates_destination_root() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("src");
        let destination = temp_dir.path().join("nested/dest");
        write(&source, "a.txt", "a").await;

        let engine = SyncEngine::new(SyncConfiguration::default()).unwrap();
        let result = engine.sync(&source, &destination).await.unwrap();

        assert_eq!(result.copied, 1);
        assert!(destination.join("a.txt").is_file());
    }

    #[tokio::test]
    async fn test_verbose_lines_reach_the_sink() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("src");
        let destination = temp_dir.path().join("dst");
        write(&source, "keep.txt", "k").await;
        write(&source, "debug.log", "d").await;
        write(&destination, "stale.txt", "s").await;

        let sink = Arc::new(CollectingSink::default());
        let config = SyncConfiguration::new()
            .with_copy_exclusions(["*.log"])
            .verbose(true);
        let engine = SyncEngine::with_sink(config, sink.clone()).unwrap();
        engine.sync(&source, &destination).await.unwrap();

        let lines = sink.0.lock().unwrap();
        assert!(lines.contains(&"info: Copied keep.txt".to_string()));
        assert!(lines.contains(&"info: Skipped debug.log (matches '*.log')".to_string()));
        assert!(lines.contains(&"info: Deleted stale.txt".to_string()));
    }

    #[tokio::test]
    async fn test_quiet_engine_sends_nothing_to_the_sink() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("src");
        write(&source, "a.txt", "a").await;

        let sink = Arc::new(CollectingSink::default());
        let engine = SyncEngine::with_sink(SyncConfiguration::default(), sink.clone()).unwrap();
        engine
            .sync(&source, temp_dir.path().join("dst"))
            .await
            .unwrap();

        assert!(sink.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dry_run_reports_without_touching_destination() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("src");
        let destination = temp_dir.path().join("dst");
        write(&source, "new.txt", "n").await;
        write(&destination, "old/stale.txt", "s").await;

        let engine = SyncEngine::new(SyncConfiguration::new().dry_run(true)).unwrap();
        let result = engine.sync(&source, &destination).await.unwrap();

        assert_eq!(result.copied, 1);
        assert_eq!(result.deleted, 1);
        assert!(!destination.join("new.txt").exists());
        assert!(destination.join("old/stale.txt").exists());
    }

    #[tokio::test]
    async fn test_directory_in_place_of_file_is_a_type_mismatch() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("src");
        let destination = temp_dir.path().join("dst");
        write(&source, "item", "file in source").await;
        fs::create_dir_all(destination.join("item")).await.unwrap();

        let engine = SyncEngine::new(SyncConfiguration::default()).unwrap();
        let error = engine.sync(&source, &destination).await.unwrap_err();

        assert!(matches!(error, Error::TypeMismatch { .. }));
    }

    #[tokio::test]
    async fn test_file_in_place_of_directory_is_a_type_mismatch() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("src");
        let destination = temp_dir.path().join("dst");
        write(&source, "item/inner.txt", "nested").await;
        write(&destination, "item", "plain file").await;

        let engine = SyncEngine::new(SyncConfiguration::default()).unwrap();
        let error = engine.sync(&source, &destination).await.unwrap_err();

        match error {
            Error::TypeMismatch { path } => assert_eq!(path, destination.join("item")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_orphaned_directory_below_source_file_is_pruned() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("src");
        let destination = temp_dir.path().join("dst");
        write(&source, "a", "file in source").await;
        fs::create_dir_all(destination.join("a/b")).await.unwrap();

        let sink = Arc::new(CollectingSink::default());
        let config = SyncConfiguration::new()
            .with_copy_exclusions(["a"])
            .verbose(true);
        let engine = SyncEngine::with_sink(config, sink.clone()).unwrap();
        let result = engine.sync(&source, &destination).await.unwrap();

        assert_eq!(result, SyncResult { copied: 0, deleted: 0, skipped: 1 });
        assert!(!destination.join("a/b").exists());
        assert!(destination.join("a").is_dir());
        let lines = sink.0.lock().unwrap();
        assert!(lines.contains(&"info: Removed empty directory a/b".to_string()));
        assert!(!lines.iter().any(|line| line.starts_with("warn:")));
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_cleanup_failure_is_reported_and_swallowed() {
        let temp_dir = TempDir::new().unwrap();
        // Deep enough that source + orphan exceeds PATH_MAX while the
        // destination counterpart stays short.
        let mut source = temp_dir.path().join("src");
        for _ in 0..14 {
            source.push("s".repeat(250));
        }
        fs::create_dir_all(&source).await.unwrap();
        let destination = temp_dir.path().join("dst");
        let orphan = [
            "d".repeat(250),
            "e".repeat(250),
            "f".repeat(250),
        ]
        .join("/");
        fs::create_dir_all(destination.join(&orphan)).await.unwrap();

        let sink = Arc::new(CollectingSink::default());
        let engine =
            SyncEngine::with_sink(SyncConfiguration::new().verbose(true), sink.clone()).unwrap();
        let result = engine.sync(&source, &destination).await.unwrap();

        assert_eq!(result, SyncResult::default());
        assert!(destination.join(&orphan).is_dir());
        let lines = sink.0.lock().unwrap();
        let expected = format!("warn: Could not remove directory {}: ", orphan);
        assert!(
            lines.iter().any(|line| line.starts_with(&expected)),
            "{lines:?}"
        );
    }
}
