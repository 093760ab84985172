//! Caller-supplied allocator handle.
//!
//! Every byte the library hands out (returned paths, traversal bookkeeping)
//! is reserved through an [`Allocator`] before it is created and released
//! through the same handle when it is dropped. The handle does not own heap
//! memory itself; it approves or denies reservations, which is where callers
//! plug in quotas, instrumentation or fault injection.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// A reservation request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocError {
    pub requested: usize,
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "allocation of {} bytes refused", self.requested)
    }
}

impl std::error::Error for AllocError {}

/// Allocate/deallocate pair with opaque state.
///
/// `deallocate` is called exactly once for every successful `allocate`,
/// with the same size.
pub trait Allocator {
    fn allocate(&self, size: usize) -> Result<(), AllocError>;
    fn deallocate(&self, size: usize);
}

impl<A: Allocator + ?Sized> Allocator for &A {
    fn allocate(&self, size: usize) -> Result<(), AllocError> {
        (**self).allocate(size)
    }

    fn deallocate(&self, size: usize) {
        (**self).deallocate(size)
    }
}

/// Grants every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemAllocator;

impl Allocator for SystemAllocator {
    fn allocate(&self, _size: usize) -> Result<(), AllocError> {
        Ok(())
    }

    fn deallocate(&self, _size: usize) {}
}

/// Instrumented allocator tracking live bytes and allocations.
///
/// Optionally refuses requests past a byte limit, or every request after
/// the first `n` (fault injection). Counters are atomic, so a shared
/// `CountingAllocator` may be used from several threads.
#[derive(Debug, Default)]
pub struct CountingAllocator {
    live_bytes: AtomicUsize,
    live_allocations: AtomicUsize,
    attempts: AtomicUsize,
    byte_limit: Option<usize>,
    fail_after: Option<usize>,
}

impl CountingAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse any request that would push live bytes above `limit`.
    pub fn with_byte_limit(limit: usize) -> Self {
        Self {
            byte_limit: Some(limit),
            ..Self::default()
        }
    }

    /// Grant the first `n` requests, refuse every one after.
    pub fn failing_after(n: usize) -> Self {
        Self {
            fail_after: Some(n),
            ..Self::default()
        }
    }

    pub fn live_bytes(&self) -> usize {
        self.live_bytes.load(Ordering::SeqCst)
    }

    pub fn live_allocations(&self) -> usize {
        self.live_allocations.load(Ordering::SeqCst)
    }

    /// Number of `allocate` calls seen, granted or not.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl Allocator for CountingAllocator {
    fn allocate(&self, size: usize) -> Result<(), AllocError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_after.is_some_and(|n| attempt >= n) {
            return Err(AllocError { requested: size });
        }
        let limit = self.byte_limit.unwrap_or(usize::MAX);
        self.live_bytes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |live| {
                live.checked_add(size).filter(|total| *total <= limit)
            })
            .map_err(|_| AllocError { requested: size })?;
        self.live_allocations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn deallocate(&self, size: usize) {
        self.live_bytes.fetch_sub(size, Ordering::SeqCst);
        self.live_allocations.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Bytes reserved from an allocator, released on drop.
pub struct Reservation<'a, A: Allocator + ?Sized> {
    allocator: &'a A,
    size: usize,
}

impl<'a, A: Allocator + ?Sized> Reservation<'a, A> {
    pub fn new(allocator: &'a A, size: usize) -> Result<Self, AllocError> {
        allocator.allocate(size)?;
        Ok(Self { allocator, size })
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

impl<A: Allocator + ?Sized> Drop for Reservation<'_, A> {
    fn drop(&mut self) {
        self.allocator.deallocate(self.size);
    }
}

impl<A: Allocator + ?Sized> fmt::Debug for Reservation<'_, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reservation").field("size", &self.size).finish()
    }
}

/// A path owned by the caller, accounted against the allocator that
/// produced it.
pub struct OwnedPath<'a, A: Allocator + ?Sized> {
    value: OsString,
    _reservation: Reservation<'a, A>,
}

impl<'a, A: Allocator + ?Sized> OwnedPath<'a, A> {
    /// Reserve `value.len()` bytes from `allocator` and take ownership of `value`.
    pub fn new(value: OsString, allocator: &'a A) -> Result<Self, AllocError> {
        let reservation = Reservation::new(allocator, value.len())?;
        Ok(Self {
            value,
            _reservation: reservation,
        })
    }

    pub fn as_os_str(&self) -> &OsStr {
        &self.value
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.value)
    }

    /// Length in bytes of the platform encoding.
    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn to_str(&self) -> Option<&str> {
        self.value.to_str()
    }

    /// Detach the path from allocator accounting.
    pub fn into_path_buf(self) -> PathBuf {
        PathBuf::from(self.value)
    }
}

impl<A: Allocator + ?Sized> Deref for OwnedPath<'_, A> {
    type Target = Path;

    fn deref(&self) -> &Path {
        self.as_path()
    }
}

impl<A: Allocator + ?Sized> AsRef<Path> for OwnedPath<'_, A> {
    fn as_ref(&self) -> &Path {
        self.as_path()
    }
}

impl<A: Allocator + ?Sized> AsRef<OsStr> for OwnedPath<'_, A> {
    fn as_ref(&self) -> &OsStr {
        &self.value
    }
}

impl<A: Allocator + ?Sized> fmt::Debug for OwnedPath<'_, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.value, f)
    }
}

impl<A: Allocator + ?Sized> PartialEq<str> for OwnedPath<'_, A> {
    fn eq(&self, other: &str) -> bool {
        self.value == *other
    }
}

impl<A: Allocator + ?Sized> PartialEq<&str> for OwnedPath<'_, A> {
    fn eq(&self, other: &&str) -> bool {
        self.value == **other
    }
}

impl<A: Allocator + ?Sized> PartialEq<Path> for OwnedPath<'_, A> {
    fn eq(&self, other: &Path) -> bool {
        self.as_path() == other
    }
}
