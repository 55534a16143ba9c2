//! Error types for the five-words crate.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors. Per-line problems in the dictionary are not errors; see
/// [`crate::word::WordError`].
#[derive(Debug, Error)]
pub enum Error {
    /// The dictionary file could not be opened.
    #[error("cannot open dictionary '{}': {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    /// Reading the dictionary failed part way through.
    #[error("read failed at line {line}: {source}")]
    Read { line: usize, source: io::Error },

    /// Writing results failed.
    #[error("cannot write results: {0}")]
    Write(#[from] io::Error),

    /// The search parameters cannot describe any combination.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
