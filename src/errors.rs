//! Error taxonomy shared by every layer of the repository core
//!
//! Library operations return [`Result`]; the binary wraps these errors in
//! `anyhow` for reporting.

use std::path::PathBuf;
use thiserror::Error;

/// Describes everything that can go wrong while reading or writing repository data.
#[derive(Debug, Error)]
pub enum Error {
    #[error("object {0} not found")]
    NotFound(String),

    #[error("ambiguous reference {name}: candidates are:\n - {}", candidates.join("\n - "))]
    AmbiguousReference {
        name: String,
        candidates: Vec<String>,
    },

    #[error("no such reference {0}")]
    NoSuchReference(String),

    #[error("corrupt object: {0}")]
    CorruptObject(String),

    #[error("unknown object type {0}")]
    UnknownObjectType(String),

    #[error("expected a {expected} object, got a {actual}")]
    UnexpectedObjectType { expected: String, actual: String },

    #[error("invalid object id {0}")]
    InvalidObjectId(String),

    #[error("index checksum does not match the value stored on disk")]
    ChecksumMismatch,

    #[error("index declares {expected} entries but {actual} could be read")]
    IndexCountMismatch { expected: u32, actual: u32 },

    #[error("corrupt index: {0}")]
    CorruptIndex(String),

    #[error("unsupported {what} version {version}")]
    UnsupportedVersion { what: &'static str, version: u32 },

    #[error("{} is not empty", .0.display())]
    NonEmptyTarget(PathBuf),

    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("refusing to write unsafe path {0:?}")]
    InvalidPath(String),

    #[error("tree nesting exceeds {0} levels")]
    TreeTooDeep(usize),

    #[error("reference cycle detected while resolving {0}")]
    CycleDetected(String),

    #[error("not a git repository (or any of the parent directories): {}", .0.display())]
    NotARepository(PathBuf),

    #[error("repository already initialized at {}", .0.display())]
    AlreadyInitialized(PathBuf),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    #[error(transparent)]
    Regex(#[from] regex::Error),
}

/// A specialized `Result` type for repository operations.
pub type Result<T> = std::result::Result<T, Error>;
