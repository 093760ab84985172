use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all fsutil operations.
#[derive(Debug, Error, Diagnostic)]
pub enum FsError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The allocator handle refused a reservation.
    #[error("Failed to allocate memory !")]
    OutOfMemory,

    /// Neither `HOME` nor `USERPROFILE` yielded a home directory.
    #[error("Home directory could not be resolved")]
    #[diagnostic(help("Set HOME (or USERPROFILE on Windows) to expand `~`"))]
    HomeNotFound,

    /// A directory was expected.
    #[error("Path is not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    /// A regular file was expected.
    #[error("Path is not a file: {}", path.display())]
    NotAFile { path: PathBuf },

    /// The host refused to enumerate a directory.
    #[error("Can't open directory {}. Error code: {code}", path.display())]
    OpenDirectory { path: PathBuf, code: i32 },

    /// The path was rejected before reaching the host (empty, not absolute).
    #[error("Invalid path: {message}")]
    InvalidPath { message: String },

    /// The user configuration could not be read or parsed.
    #[error("Config error: {message}")]
    #[diagnostic(help("Check ~/.fsutil/config.toml for syntax errors"))]
    Config { message: String },
}

impl From<crate::alloc::AllocError> for FsError {
    fn from(_: crate::alloc::AllocError) -> Self {
        FsError::OutOfMemory
    }
}
