//! Tree fixtures and inspection helpers

use filetime::FileTime;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;
use treemirror_types::{LogLevel, LogSink};
use walkdir::WalkDir;

/// A source and destination directory living under one temporary root
pub struct SyncFixture {
    _temp_dir: TempDir,
    /// Source tree root
    pub source: PathBuf,
    /// Destination tree root (not created until needed)
    pub destination: PathBuf,
}

impl SyncFixture {
    /// Create a fixture with an empty source directory and no destination
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let source = temp_dir.path().join("source");
        let destination = temp_dir.path().join("destination");
        fs::create_dir_all(&source).expect("Failed to create source dir");
        Self {
            _temp_dir: temp_dir,
            source,
            destination,
        }
    }

    /// Populate the source tree
    pub fn with_source(self, files: &[(&str, &str)]) -> Self {
        create_tree(&self.source, files);
        self
    }

    /// Populate the destination tree
    pub fn with_destination(self, files: &[(&str, &str)]) -> Self {
        create_tree(&self.destination, files);
        self
    }
}

impl Default for SyncFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Write every `(relative path, content)` pair below `root`
pub fn create_tree(root: &Path, files: &[(&str, &str)]) {
    fs::create_dir_all(root).expect("Failed to create tree root");
    for (relative, content) in files {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(&path, content).expect("Failed to write test file");
    }
}

/// Create empty directories below `root`
pub fn create_dirs(root: &Path, directories: &[&str]) {
    for relative in directories {
        fs::create_dir_all(root.join(relative)).expect("Failed to create dir");
    }
}

/// Relative `/`-separated paths of every regular file below `root`
pub fn list_files(root: &Path) -> BTreeSet<String> {
    list_entries(root, |entry| entry.file_type().is_file())
}

/// Relative `/`-separated paths of every directory below `root`
pub fn list_dirs(root: &Path) -> BTreeSet<String> {
    list_entries(root, |entry| entry.file_type().is_dir())
}

fn list_entries<F>(root: &Path, keep: F) -> BTreeSet<String>
where
    F: Fn(&walkdir::DirEntry) -> bool,
{
    if !root.exists() {
        return BTreeSet::new();
    }

    WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| keep(entry))
        .filter_map(|entry| {
            entry.path().strip_prefix(root).ok().map(|relative| {
                relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join("/")
            })
        })
        .collect()
}

/// Read a file below `root` as UTF-8
pub fn read_file(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).expect("Failed to read test file")
}

/// Set the modification time of a file to `seconds` after the Unix epoch
pub fn set_mtime(path: &Path, seconds: i64) {
    filetime::set_file_mtime(path, FileTime::from_unix_time(seconds, 0))
        .expect("Failed to set modification time");
}

/// Modification time of a file
pub fn mtime(path: &Path) -> FileTime {
    let metadata = fs::metadata(path).expect("Failed to read metadata");
    FileTime::from_last_modification_time(&metadata)
}

/// Sink that records every message it receives
#[derive(Debug, Default)]
pub struct CollectingSink {
    lines: Mutex<Vec<(LogLevel, String)>>,
}

impl CollectingSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages received so far
    pub fn messages(&self) -> Vec<String> {
        self.lines
            .lock()
            .expect("sink lock poisoned")
            .iter()
            .map(|(_, message)| message.clone())
            .collect()
    }

    /// Messages received at `level`
    pub fn messages_at(&self, level: LogLevel) -> Vec<String> {
        self.lines
            .lock()
            .expect("sink lock poisoned")
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

impl LogSink for CollectingSink {
    fn log(&self, level: LogLevel, message: &str) {
        self.lines
            .lock()
            .expect("sink lock poisoned")
            .push((level, message.to_string()));
    }
}
