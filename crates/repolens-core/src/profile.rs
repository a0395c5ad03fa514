use std::path::Path;

use anyhow::Result;

use crate::types::Extraction;

/// Returns true iff the line contains anything other than whitespace.
pub fn is_non_blank(line: &str) -> bool {
    !line.trim().is_empty()
}

/// Trait that each language profile must implement.
///
/// A profile owns everything language-specific: turning raw source text into
/// a comment/docstring-free normalized line stream, and the single-line
/// heuristics the metrics are computed from. The heuristics are line-oriented
/// pattern matchers, not parsers; their precision is explicitly best-effort.
pub trait LanguageProfile: Send + Sync {
    /// Language name (e.g., "python")
    fn language(&self) -> &'static str;

    /// File extensions this profile handles (e.g., &["py"])
    fn file_extensions(&self) -> &[&str];

    /// Normalize one file: classify its token stream and emit one
    /// comment/docstring-free line per physical source line, in order.
    /// Fails with `Error::MalformedSource` when the token stream cannot be
    /// parsed; the caller must skip the whole file.
    fn normalize(&self, path: &Path, content: &str) -> Result<Vec<String>>;

    /// True iff the line looks like a function definition.
    fn is_function(&self, line: &str) -> bool;

    /// True iff the line introduces a loop.
    fn is_loop(&self, line: &str) -> bool;

    /// True iff the line imports a package.
    fn is_import(&self, line: &str) -> bool;

    /// Package names imported by the line.
    fn extract_packages(&self, line: &str) -> Extraction;

    /// Parameter names of a function-definition line, receiver excluded.
    fn extract_parameters(&self, line: &str) -> Extraction;

    /// Names assigned on the line (line-local, not flow-aware).
    fn extract_variables(&self, line: &str) -> Extraction;
}
