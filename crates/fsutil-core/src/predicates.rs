//! Stat-backed path queries.
//!
//! Every predicate collapses a failed `stat` into `false`. None of them
//! allocate or emit diagnostics. Symbolic links are followed.

use std::path::Path;

use crate::platform::{self, OwnerAccess};

/// Lightweight classification of a filesystem path's kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    /// `stat` failed.
    NotFound,
    Directory,
    /// A regular file.
    File,
    /// Exists, but is neither (socket, FIFO, device).
    Other,
}

impl PathKind {
    /// Classify `path` with a single `stat`.
    pub fn of(path: impl AsRef<Path>) -> Self {
        match platform::stat(path.as_ref()) {
            None => PathKind::NotFound,
            Some(meta) if meta.is_dir() => PathKind::Directory,
            Some(meta) if meta.is_file() => PathKind::File,
            Some(_) => PathKind::Other,
        }
    }
}

pub fn exists(path: impl AsRef<Path>) -> bool {
    platform::stat(path.as_ref()).is_some()
}

pub fn is_directory(path: impl AsRef<Path>) -> bool {
    PathKind::of(path) == PathKind::Directory
}

pub fn is_file(path: impl AsRef<Path>) -> bool {
    PathKind::of(path) == PathKind::File
}

fn owner_access(path: &Path) -> Option<OwnerAccess> {
    platform::stat(path).map(|meta| OwnerAccess::of(&meta))
}

/// Owner-read bit is set.
pub fn is_readable(path: impl AsRef<Path>) -> bool {
    owner_access(path.as_ref()).is_some_and(|access| access.read)
}

/// Owner-write bit is set.
pub fn is_writable(path: impl AsRef<Path>) -> bool {
    owner_access(path.as_ref()).is_some_and(|access| access.write)
}

/// Both owner bits are set. On Windows this is the write bit alone.
pub fn is_readable_and_writable(path: impl AsRef<Path>) -> bool {
    owner_access(path.as_ref()).is_some_and(|access| access.read && access.write)
}
