//! One-way directory mirroring for treemirror
//!
//! This crate mirrors a source directory tree into a destination tree:
//!
//! - **Tree walking**: enumerate files and directories as root-relative paths
//! - **Exclusion patterns**: case-insensitive `*`/`?` globs for the copy and delete phases
//! - **Change detection**: modification time plus size, never content hashing
//! - **Orchestration**: copy, delete, then prune empty destination directories
//!
//! # Examples
//!
//! ```rust,no_run
//! use treemirror_sync::SyncEngine;
//! use treemirror_types::SyncConfiguration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SyncConfiguration::new()
//!     .with_copy_exclusions(["*.tmp"])
//!     .with_delete_exclusions(["local/*"]);
//! let engine = SyncEngine::new(config)?;
//! let result = engine.sync("source_dir", "dest_dir").await?;
//! println!("{} copied, {} deleted, {} skipped", result.copied, result.deleted, result.skipped);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod detector;
pub mod engine;
pub mod pattern;
pub mod sink;
pub mod walker;

pub use detector::{ChangeDetector, FileSnapshot};
pub use engine::SyncEngine;
pub use pattern::{matches_pattern, PatternSet};
pub use sink::{TracingSink, ACTION_TARGET};
pub use walker::{TreeListing, TreeWalker};
