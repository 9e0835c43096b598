//! Glob-style exclusion patterns
//!
//! Patterns support two wildcards: `*` matches any run of characters except
//! `/`, and `?` matches exactly one character except `/`. Everything else,
//! including `.`, is literal. Matching is anchored and case-insensitive.
//!
//! A pattern without a `/` is tested against the file name only, so `*.log`
//! matches `a.log` and `dir/a.log`. A pattern containing a `/` is tested
//! against the full relative path and against each of its leading directory
//! prefixes, so `temp/*` matches `temp/a.tmp` and everything below
//! `temp/sub/`, but nothing under `tempfoo/`. A pattern ending in `/` names
//! directories: it is tested against the leading directory prefixes only, so
//! `*/` matches `d/n.txt` but not `top.txt`.

use regex::{Regex, RegexBuilder};
use treemirror_types::path::normalize_separators;
use treemirror_types::{Error, RelativePath, Result};

const SEPARATOR: char = '/';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchScope {
    FileName,
    FullPath,
    Directory,
}

#[derive(Debug, Clone)]
struct CompiledPattern {
    source: String,
    regex: Regex,
    scope: MatchScope,
}

impl CompiledPattern {
    fn compile(pattern: &str) -> Result<Self> {
        let normalized = pattern.replace('\\', "/");
        let scope = if normalized.ends_with(SEPARATOR) {
            MatchScope::Directory
        } else if normalized.contains(SEPARATOR) {
            MatchScope::FullPath
        } else {
            MatchScope::FileName
        };
        let body = match scope {
            MatchScope::FullPath | MatchScope::Directory => normalize_separators(&normalized),
            MatchScope::FileName => normalized,
        };

        let regex = RegexBuilder::new(&glob_to_regex(&body))
            .case_insensitive(true)
            .build()
            .map_err(|e| Error::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
            scope,
        })
    }

    fn is_match(&self, path: &RelativePath) -> bool {
        match self.scope {
            MatchScope::FileName => self.regex.is_match(path.file_name()),
            MatchScope::FullPath => {
                self.regex.is_match(path.as_str())
                    || path.ancestors().any(|prefix| self.regex.is_match(prefix))
            }
            MatchScope::Directory => path.ancestors().any(|prefix| self.regex.is_match(prefix)),
        }
    }
}

/// Translate a glob into an anchored regular expression
pub fn glob_to_regex(glob: &str) -> String {
    let mut expr = String::with_capacity(glob.len() + 8);
    expr.push('^');
    let mut literal = String::new();
    for ch in glob.chars() {
        match ch {
            '*' | '?' => {
                expr.push_str(&regex::escape(&literal));
                literal.clear();
                expr.push_str(if ch == '*' { "[^/]*" } else { "[^/]" });
            }
            _ => literal.push(ch),
        }
    }
    expr.push_str(&regex::escape(&literal));
    expr.push('$');
    expr
}

/// An ordered set of compiled exclusion patterns
///
/// Patterns are compiled once; matching is pure and allocation free.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<CompiledPattern>,
}

impl PatternSet {
    /// Compile a list of patterns, preserving their order
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|pattern| CompiledPattern::compile(pattern.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// A set that matches nothing
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether any pattern matches `path`
    pub fn is_match(&self, path: &RelativePath) -> bool {
        self.first_match(path).is_some()
    }

    /// The first pattern, in configuration order, that matches `path`
    pub fn first_match(&self, path: &RelativePath) -> Option<&str> {
        self.patterns
            .iter()
            .find(|pattern| pattern.is_match(path))
            .map(|pattern| pattern.source.as_str())
    }

    /// Number of patterns
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether the set holds no patterns
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Check a single path against a single pattern
///
/// Compiles the pattern on every call; use [`PatternSet`] for repeated matching.
pub fn matches_pattern(path: &str, pattern: &str) -> bool {
    CompiledPattern::compile(pattern)
        .map(|compiled| compiled.is_match(&RelativePath::new(path)))
        .unwrap_or(false)
}
