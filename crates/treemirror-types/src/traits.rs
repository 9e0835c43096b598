//! Injectable capabilities
//!
//! The engine never writes to a global logger for its per-action output.
//! Callers hand it a [`LogSink`] at construction; [`NoopSink`] is the default.

use std::fmt;

/// Level attached to every sink message
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Fine-grained diagnostics
    Debug,
    /// Regular progress lines
    Info,
    /// Something was ignored that the user may care about
    Warn,
    /// A failure
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// Destination for human-readable progress lines
pub trait LogSink: Send + Sync {
    /// Record one message
    fn log(&self, level: LogLevel, message: &str);
}

/// Sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl LogSink for NoopSink {
    fn log(&self, _level: LogLevel, _message: &str) {}
}

impl<T: LogSink + ?Sized> LogSink for std::sync::Arc<T> {
    fn log(&self, level: LogLevel, message: &str) {
        (**self).log(level, message);
    }
}
