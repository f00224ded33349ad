//! Library error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StashError {
    #[error("invalid line range: start {start} is past end {end}")]
    InvalidRange { start: usize, end: usize },

    #[error("cannot build a tree from an empty path list")]
    EmptyPathList,

    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("persistence failure: {0}")]
    Persist(String),

    #[error("no saved group with id {0}")]
    GroupNotFound(String),
}
