//! Error types for ab1-trimmer

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for trimming operations
pub type Result<T> = std::result::Result<T, TrimError>;

#[derive(Debug, Error)]
pub enum TrimError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a readable ABIF container.
    #[error("invalid ABIF file {path}: {msg}")]
    InvalidAbif { path: PathBuf, msg: String },

    #[error("ABIF file {path} has no {tag} entry")]
    MissingTag { path: PathBuf, tag: String },

    /// Base calls and quality scores must stay position-aligned.
    #[error("trace {name}: {bases} bases but {quals} quality values")]
    LengthMismatch {
        name: String,
        bases: usize,
        quals: usize,
    },

    /// Two inputs would write the same per-trace output file.
    #[error("{path}: output name {name} is already used by another trace")]
    OutputCollision { path: PathBuf, name: String },

    /// The average quality of an empty trace is undefined.
    #[error("trace {name}: cannot average an empty quality sequence")]
    EmptyQuality { name: String },
}
