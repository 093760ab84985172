//! Single-level directory creation.
//!
//! Parents are never created. An existing directory counts as success;
//! that check runs after the failed `mkdir`, so a concurrent remove or
//! replace between the two calls can flip the outcome.

use std::io::ErrorKind;
use std::path::Path;

use fsutil_util::errors::FsError;

use crate::platform;
use crate::predicates::is_directory;

/// Create the leaf directory `path` (mode `0775` on POSIX).
///
/// Rejects empty paths and, on POSIX, paths without a leading `/`.
pub fn create_dir(path: impl AsRef<Path>) -> Result<(), FsError> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Err(FsError::InvalidPath {
            message: "path is empty".to_string(),
        });
    }
    if !platform::is_creatable_path(path) {
        return Err(FsError::InvalidPath {
            message: format!("{} is not absolute", path.display()),
        });
    }

    match platform::create_dir(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists && is_directory(path) => {
            tracing::trace!("{} already exists", path.display());
            Ok(())
        }
        Err(e) => Err(FsError::Io(e)),
    }
}

/// [`create_dir`] collapsed to a boolean.
pub fn mkdir(path: impl AsRef<Path>) -> bool {
    create_dir(path).is_ok()
}
