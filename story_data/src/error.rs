//! Errors raised while loading story data.

use std::path::PathBuf;

/// Failures while reading or parsing story files.
#[derive(Debug, thiserror::Error)]
pub enum StoryError {
    #[error("failed to read story file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed story data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Convenience alias for story loading results.
pub type StoryResult<T> = Result<T, StoryError>;
