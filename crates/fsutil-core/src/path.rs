//! Pure functions over path strings.
//!
//! No normalization happens here: inputs are concatenated or rewritten
//! byte for byte, and every result is a fresh [`OwnedPath`] reserved from
//! the caller's allocator.

use std::ffi::{OsStr, OsString};

use fsutil_util::alloc::{Allocator, OwnedPath};
use fsutil_util::errors::FsError;

use crate::platform::{self, PATH_DELIMITER};

/// `left ++ PATH_DELIMITER ++ right`.
///
/// Nothing is trimmed: `join("a/", "b")` is `"a//b"` on POSIX.
pub fn join<'a, A: Allocator + ?Sized>(
    left: impl AsRef<OsStr>,
    right: impl AsRef<OsStr>,
    allocator: &'a A,
) -> Result<OwnedPath<'a, A>, FsError> {
    let (left, right) = (left.as_ref(), right.as_ref());
    let mut joined = OsString::with_capacity(left.len() + PATH_DELIMITER.len() + right.len());
    joined.push(left);
    joined.push(PATH_DELIMITER);
    joined.push(right);
    Ok(OwnedPath::new(joined, allocator)?)
}

/// Copy of `path` with every `/` replaced by the native delimiter.
pub fn to_native<'a, A: Allocator + ?Sized>(
    path: &str,
    allocator: &'a A,
) -> Result<OwnedPath<'a, A>, FsError> {
    let native = if PATH_DELIMITER == "/" {
        path.to_string()
    } else {
        path.replace('/', PATH_DELIMITER)
    };
    Ok(OwnedPath::new(native.into(), allocator)?)
}

/// Replace a leading `~` with the home directory.
///
/// Paths without a leading `~` come back as a plain copy. `~user` is not
/// looked up: `~foo` becomes `<home>foo`.
pub fn expand_user<'a, A: Allocator + ?Sized>(
    path: &str,
    allocator: &'a A,
) -> Result<OwnedPath<'a, A>, FsError> {
    let home = platform::home_dir();
    expand_user_with_home(path, home.as_deref(), allocator)
}

/// [`expand_user`] with the home directory supplied by the caller.
pub fn expand_user_with_home<'a, A: Allocator + ?Sized>(
    path: &str,
    home: Option<&OsStr>,
    allocator: &'a A,
) -> Result<OwnedPath<'a, A>, FsError> {
    let Some(rest) = path.strip_prefix('~') else {
        return Ok(OwnedPath::new(path.into(), allocator)?);
    };
    let home = home.ok_or(FsError::HomeNotFound)?;
    let mut expanded = OsString::with_capacity(home.len() + rest.len());
    expanded.push(home);
    expanded.push(rest);
    Ok(OwnedPath::new(expanded, allocator)?)
}
