//! treemirror integration testing support
//!
//! Helpers shared by the integration tests: building directory trees from
//! `(path, content)` lists, listing trees back as relative `/` paths and
//! capturing engine log output.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Unified test utilities
pub mod test_utils;

pub use test_utils::*;
