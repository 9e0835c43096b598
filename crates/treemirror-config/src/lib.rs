//! Configuration management for treemirror
//!
//! Settings are layered: built-in defaults first, then an optional file
//! (YAML, TOML or JSON, picked by extension), then environment variables with
//! the `TREEMIRROR` prefix and `__` as the nesting separator, e.g.
//! `TREEMIRROR__SYNC__VERBOSE=true` or
//! `TREEMIRROR__SYNC__COPY_EXCLUDE="*.log,*.tmp"`.
//!
//! # Examples
//!
//! ```rust,no_run
//! use treemirror_config::ConfigBuilder;
//!
//! let config = ConfigBuilder::new()
//!     .add_defaults()
//!     .add_source_file("treemirror.yaml")
//!     .add_env_prefix("TREEMIRROR")
//!     .build()
//!     .expect("Failed to load configuration");
//!
//! let engine_config = config.to_sync_configuration();
//! println!("copy exclusions: {:?}", engine_config.copy_exclusions);
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use serde::{Deserialize, Serialize};
use treemirror_types::SyncConfiguration;

pub mod builder;
pub mod error;
pub mod loader;

pub use builder::ConfigBuilder;
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;

/// Log levels accepted by `logging.level`
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Main configuration structure for treemirror
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Synchronization settings
    pub sync: SyncSettings,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Synchronization settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Patterns excluded from the copy phase
    pub copy_exclude: Vec<String>,
    /// Patterns excluded from the delete phase
    pub delete_exclude: Vec<String>,
    /// Emit one line per action
    pub verbose: bool,
    /// Report changes without applying them
    pub dry_run: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level used when `RUST_LOG` is not set
    pub level: String,
    /// Enable colored output
    pub colored_output: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            colored_output: true,
        }
    }
}

impl Config {
    /// Build the engine configuration described by these settings
    pub fn to_sync_configuration(&self) -> SyncConfiguration {
        SyncConfiguration::new()
            .with_copy_exclusions(self.sync.copy_exclude.iter().cloned())
            .with_delete_exclusions(self.sync.delete_exclude.iter().cloned())
            .verbose(self.sync.verbose)
            .dry_run(self.sync.dry_run)
    }
}
