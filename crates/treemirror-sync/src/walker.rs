//! Recursive tree enumeration

use std::collections::HashSet;
use std::io;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, trace};
use treemirror_types::{Error, RelativePath, Result};

/// Files and directories found under a root, as root-relative paths
#[derive(Debug, Clone, Default)]
pub struct TreeListing {
    /// Every regular file reachable under the root
    pub files: HashSet<RelativePath>,
    /// Every directory reachable under the root, listed individually
    pub directories: HashSet<RelativePath>,
}

impl TreeListing {
    /// Whether nothing was found
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.directories.is_empty()
    }

    /// Directories ordered deepest first, ties broken by path
    pub fn directories_deepest_first(&self) -> Vec<&RelativePath> {
        let mut directories: Vec<_> = self.directories.iter().collect();
        directories.sort_by(|a, b| b.depth().cmp(&a.depth()).then_with(|| a.cmp(b)));
        directories
    }
}

/// Walks a directory tree with an explicit work list
///
/// A missing root (or a directory that disappears mid-walk) yields an empty
/// listing for that subtree. Every other I/O error aborts the walk. Entries
/// are classified by their own file type, so symbolic links are neither
/// files nor directories and are left out.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeWalker;

impl TreeWalker {
    /// Create a new tree walker
    pub fn new() -> Self {
        Self
    }

    /// Enumerate everything under `root`
    pub async fn walk<P: AsRef<Path>>(&self, root: P) -> Result<TreeListing> {
        let root = root.as_ref();
        let mut listing = TreeListing::default();
        let mut pending = vec![RelativePath::default()];

        while let Some(directory) = pending.pop() {
            let directory_path = directory.to_path(root);
            let mut entries = match fs::read_dir(&directory_path).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    debug!("Directory not found, treating as empty: {}", directory_path.display());
                    continue;
                }
                Err(e) => return Err(Error::io("read directory", &directory_path, &e)),
            };

            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| Error::io("read directory entry in", &directory_path, &e))?
            {
                let file_type = match entry.file_type().await {
                    Ok(file_type) => file_type,
                    Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                    Err(e) => return Err(Error::io("get file type of", &entry.path(), &e)),
                };

                let relative = directory.join(&entry.file_name());
                if file_type.is_dir() {
                    listing.directories.insert(relative.clone());
                    pending.push(relative);
                } else if file_type.is_file() {
                    listing.files.insert(relative);
                } else {
                    trace!("Ignoring special entry: {}", relative);
                }
            }
        }

        info!(
            "Scanned {} files and {} directories in '{}'",
            listing.files.len(),
            listing.directories.len(),
            root.display()
        );
        Ok(listing)
    }
}
