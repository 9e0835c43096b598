//! Core types and error handling for treemirror
//!
//! This crate provides the vocabulary shared by the synchronization engine, the
//! configuration layer and the command line front end:
//!
//! - **Error handling**: a single [`Error`] type with kinds and severity levels
//! - **Relative paths**: separator-normalized, root-relative [`RelativePath`] values
//! - **Configuration**: the immutable [`SyncConfiguration`] handed to the engine
//! - **Results**: the [`SyncResult`] counters returned by every sync
//! - **Logging**: the injectable [`LogSink`] capability
//!
//! # Features
//!
//! - `serde`: Serialize and deserialize the configuration, result, path and
//!   error types
//!
//! # Examples
//!
//! ```rust
//! use treemirror_types::{RelativePath, SyncConfiguration};
//!
//! let config = SyncConfiguration::new()
//!     .with_copy_exclusions(["*.log"])
//!     .with_delete_exclusions(["keep/*"]);
//! assert_eq!(config.copy_exclusions, vec!["*.log".to_string()]);
//!
//! let path = RelativePath::new("dir\\file.txt");
//! assert_eq!(path.as_str(), "dir/file.txt");
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod path;
pub mod result;
pub mod traits;
pub mod types;

pub use config::SyncConfiguration;
pub use error::{Error, ErrorKind, ErrorSeverity};
pub use path::RelativePath;
pub use result::Result;
pub use traits::{LogLevel, LogSink, NoopSink};
pub use types::SyncResult;
