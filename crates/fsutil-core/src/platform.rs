//! Narrow shim over the host filesystem.
//!
//! `std::fs` already dispatches to `stat`/`opendir`/`readdir`/`mkdir` on
//! POSIX and to `FindFirstFileW`/`FindNextFileW`/`CreateDirectoryW` on
//! Windows; this module pins down the few places where the two hosts still
//! differ for us: the path delimiter, owner permission bits, the creation
//! mode, and the home-directory variable.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::Path;

use fsutil_util::alloc::{Allocator, OwnedPath};
use fsutil_util::errors::FsError;

/// Native path delimiter.
#[cfg(windows)]
pub const PATH_DELIMITER: &str = "\\";
/// Native path delimiter.
#[cfg(not(windows))]
pub const PATH_DELIMITER: &str = "/";

#[cfg(windows)]
const HOME_VAR: &str = "USERPROFILE";
#[cfg(not(windows))]
const HOME_VAR: &str = "HOME";

/// Mode bits for directories created by [`create_dir`].
#[cfg(unix)]
pub const DIR_MODE: u32 = 0o775;

/// Write the current working directory into `buffer`, NUL-terminated.
///
/// Fails when the buffer is empty, when the host call fails, or when the
/// path plus its terminator does not fit. The bytes are the platform's
/// `OsStr` encoding.
pub fn get_cwd(buffer: &mut [u8]) -> bool {
    if buffer.is_empty() {
        return false;
    }
    let Ok(cwd) = std::env::current_dir() else {
        return false;
    };
    let bytes = cwd.as_os_str().as_encoded_bytes();
    if bytes.len() >= buffer.len() {
        return false;
    }
    buffer[..bytes.len()].copy_from_slice(bytes);
    buffer[bytes.len()] = 0;
    true
}

/// The current working directory as a caller-owned path.
pub fn current_dir<A: Allocator + ?Sized>(allocator: &A) -> Result<OwnedPath<'_, A>, FsError> {
    let cwd = std::env::current_dir()?;
    Ok(OwnedPath::new(cwd.into_os_string(), allocator)?)
}

/// Home directory from `HOME` (`USERPROFILE` on Windows). Empty values
/// count as unset.
pub fn home_dir() -> Option<OsString> {
    std::env::var_os(HOME_VAR).filter(|home| !home.is_empty())
}

/// `stat` the path, following symbolic links.
pub fn stat(path: &Path) -> Option<fs::Metadata> {
    fs::metadata(path).ok()
}

/// Owner read/write permission bits of a stat result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerAccess {
    pub read: bool,
    pub write: bool,
}

impl OwnerAccess {
    #[cfg(unix)]
    pub fn of(meta: &fs::Metadata) -> Self {
        use std::os::unix::fs::PermissionsExt;

        let mode = meta.permissions().mode();
        Self {
            read: mode & 0o400 != 0,
            write: mode & 0o200 != 0,
        }
    }

    // Windows reports `_S_IREAD` for everything it can stat; only the
    // read-only attribute clears `_S_IWRITE`.
    #[cfg(not(unix))]
    pub fn of(meta: &fs::Metadata) -> Self {
        Self {
            read: true,
            write: !meta.permissions().readonly(),
        }
    }
}

/// Single-level directory creation with the platform's default mode.
#[cfg(unix)]
pub fn create_dir(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new().mode(DIR_MODE).create(path)
}

/// Single-level directory creation with the platform's default mode.
#[cfg(not(unix))]
pub fn create_dir(path: &Path) -> io::Result<()> {
    fs::DirBuilder::new().create(path)
}

/// Whether `path` passes the host's absoluteness check for [`create_dir`].
///
/// POSIX requires a leading `/`. Windows is not checked.
pub fn is_creatable_path(path: &Path) -> bool {
    if cfg!(windows) {
        return true;
    }
    path.as_os_str().as_encoded_bytes().first() == Some(&b'/')
}

/// `.` and `..`, which would make the traversal revisit its own ancestors.
pub fn is_pseudo_entry(name: &OsStr) -> bool {
    name == "." || name == ".."
}

/// Open directory iterator yielding entry names.
///
/// On Windows the `\*` search pattern is appended by `read_dir` itself, so
/// callers always pass the bare directory path. The handle is closed when
/// the stream is dropped.
#[derive(Debug)]
pub struct DirStream {
    inner: fs::ReadDir,
}

/// Open `path` for enumeration.
pub fn open_dir(path: &Path) -> io::Result<DirStream> {
    Ok(DirStream {
        inner: fs::read_dir(path)?,
    })
}

impl Iterator for DirStream {
    type Item = OsString;

    fn next(&mut self) -> Option<OsString> {
        match self.inner.next()? {
            Ok(entry) => Some(entry.file_name()),
            // readdir signals errors the same way it signals the end.
            Err(e) => {
                tracing::debug!("directory enumeration stopped early: {e}");
                None
            }
        }
    }
}

/// Host error code for a failed call (`errno` or `GetLastError`), `-1` if
/// the error did not come from the OS.
pub fn error_code(err: &io::Error) -> i32 {
    err.raw_os_error().unwrap_or(-1)
}
