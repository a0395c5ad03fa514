use std::path::PathBuf;

use thiserror::Error;

/// Error taxonomy for corpus analysis.
///
/// Per-file failures (`MalformedSource`) skip the file and keep the
/// repository; per-repository failures (`EmptyRepository`,
/// `RepositoryAccess`) skip the repository and keep the run. Only a failure
/// to enumerate the corpus root at all is fatal.
#[derive(Debug, Error)]
pub enum Error {
    /// The token stream of a file could not be parsed. The file is skipped
    /// whole; no repair is attempted.
    #[error("malformed source in '{path}' at {line}:{column}")]
    MalformedSource {
        path: PathBuf,
        line: usize,
        column: usize,
    },

    /// The repository produced zero non-blank normalized lines. Its metrics
    /// are unavailable, not zero.
    #[error("repository '{repository}' has no non-blank lines")]
    EmptyRepository { repository: String },

    /// Listing or reading at the repository boundary failed.
    #[error("failed to access '{path}'")]
    RepositoryAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
