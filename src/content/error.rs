//! Per-document errors

use std::path::PathBuf;
use thiserror::Error;

/// Reasons a single document could not be turned into a [`Post`](super::Post)
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("front-matter block is not terminated")]
    UnterminatedFrontMatter,

    #[error("invalid front-matter: {0}")]
    InvalidFrontMatter(#[from] serde_yaml::Error),
}
