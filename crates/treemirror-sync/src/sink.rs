//! Log sink backed by `tracing`

use tracing::{debug, error, info, warn};
use treemirror_types::{LogLevel, LogSink};

/// Target of every event emitted by [`TracingSink`]
pub const ACTION_TARGET: &str = "treemirror::actions";

/// Forwards sink messages to the `tracing` subscriber at the matching level
///
/// Events use the [`ACTION_TARGET`] target so subscribers can filter
/// per-action lines separately from engine diagnostics.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TracingSink {
    /// Create a new tracing sink
    pub fn new() -> Self {
        Self
    }
}

impl LogSink for TracingSink {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Debug => debug!(target: ACTION_TARGET, "{}", message),
            LogLevel::Info => info!(target: ACTION_TARGET, "{}", message),
            LogLevel::Warn => warn!(target: ACTION_TARGET, "{}", message),
            LogLevel::Error => error!(target: ACTION_TARGET, "{}", message),
        }
    }
}
