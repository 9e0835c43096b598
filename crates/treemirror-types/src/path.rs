//! Root-relative paths
//!
//! A [`RelativePath`] is the unit of comparison between the source and the
//! destination tree. Identity follows the native name segments, so names that
//! differ only in bytes which are not valid UTF-8 stay distinct. Pattern
//! matching and display use a `/`-separated string in which `\` is also
//! treated as a separator.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Component, Path, PathBuf};

/// Canonical separator used by every [`RelativePath`]
pub const SEPARATOR: char = '/';

/// A file or directory location relative to a tree root
///
/// Equality, ordering and hashing consider the native segments. The
/// normalized string is a lossy view used for matching and display.
#[derive(Debug, Clone)]
pub struct RelativePath {
    normalized: String,
    native: PathBuf,
}

impl RelativePath {
    /// Build a relative path from a string, normalizing `\` to `/` and dropping
    /// empty and `.` segments
    pub fn new(path: impl AsRef<str>) -> Self {
        let normalized = normalize_separators(path.as_ref());
        let native = normalized
            .split(SEPARATOR)
            .filter(|segment| !segment.is_empty())
            .collect();
        Self { normalized, native }
    }

    /// Build a relative path from a native path that is already relative to its root
    pub fn from_path(path: &Path) -> Self {
        let mut segments = Vec::new();
        let mut native = PathBuf::new();
        for component in path.components() {
            if let Component::Normal(name) = component {
                segments.push(normalize_separators(&name.to_string_lossy()));
                native.push(name);
            }
        }
        segments.retain(|segment| !segment.is_empty());
        Self {
            normalized: segments.join("/"),
            native,
        }
    }

    /// Build a relative path for `path` under `root`
    ///
    /// Returns `None` if `path` is not located under `root`.
    pub fn from_root(root: &Path, path: &Path) -> Option<Self> {
        path.strip_prefix(root).ok().map(Self::from_path)
    }

    /// Normalized, `/`-separated form
    pub fn as_str(&self) -> &str {
        &self.normalized
    }

    /// Whether this is the root itself
    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }

    /// Final segment (the base name)
    pub fn file_name(&self) -> &str {
        self.normalized
            .rsplit(SEPARATOR)
            .next()
            .unwrap_or(&self.normalized)
    }

    /// Iterate over the `/`-separated segments
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.normalized
            .split(SEPARATOR)
            .filter(|segment| !segment.is_empty())
    }

    /// Number of native segments; the root has depth 0
    pub fn depth(&self) -> usize {
        self.native.components().count()
    }

    /// Leading directory prefixes, shortest first, excluding the path itself
    ///
    /// `a/b/c` yields `a` then `a/b`.
    pub fn ancestors(&self) -> impl Iterator<Item = &str> {
        self.normalized
            .match_indices(SEPARATOR)
            .map(|(index, _)| &self.normalized[..index])
    }

    /// Resolve this path against a tree root
    pub fn to_path(&self, root: &Path) -> PathBuf {
        root.join(&self.native)
    }

    /// Append a native child name
    pub fn join(&self, name: &std::ffi::OsStr) -> Self {
        let mut native = self.native.clone();
        native.push(name);
        let name = normalize_separators(&name.to_string_lossy());
        let normalized = if self.normalized.is_empty() {
            name
        } else if name.is_empty() {
            self.normalized.clone()
        } else {
            format!("{}/{}", self.normalized, name)
        };
        Self { normalized, native }
    }
}

/// Replace `\` with `/` and collapse empty or `.` segments
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
        .split(SEPARATOR)
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

impl Default for RelativePath {
    fn default() -> Self {
        Self {
            normalized: String::new(),
            native: PathBuf::new(),
        }
    }
}

impl PartialEq for RelativePath {
    fn eq(&self, other: &Self) -> bool {
        self.native == other.native
    }
}

impl Eq for RelativePath {}

impl Hash for RelativePath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.native.hash(state);
    }
}

impl PartialOrd for RelativePath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RelativePath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.native.cmp(&other.native)
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalized)
    }
}

impl From<&str> for RelativePath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for RelativePath {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.normalized)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for RelativePath {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::new(raw))
    }
}
