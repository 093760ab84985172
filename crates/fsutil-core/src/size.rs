//! File and directory size calculation.
//!
//! Directory sizes are computed by an iterative walk over a frontier of
//! not-yet-enumerated directories, so stack usage does not grow with tree
//! depth. Every frontier entry and every child path is reserved from the
//! caller's allocator and released when it goes out of scope, on both the
//! success and the failure path.
//!
//! Symbolic links are followed, like `stat`. A link pointing at one of its
//! own ancestors is therefore walked until the depth cap stops it; with an
//! unbounded cap such a loop does not terminate.

use std::path::Path;

use fsutil_util::alloc::{Allocator, OwnedPath, Reservation};
use fsutil_util::diag::{DiagnosticSink, StderrSink};
use fsutil_util::errors::FsError;

use crate::path::join;
use crate::platform;
use crate::predicates::{is_directory, is_file};

const DUPLICATE_FAILED: &str = "Failed to duplicate directory path !";
const ALLOCATION_FAILED: &str = "Failed to allocate memory !";
const JOIN_FAILED: &str = "rcutils_join_path return NULL !";

static STDERR: StderrSink = StderrSink;

/// Size in bytes of the regular file at `path`.
///
/// Anything that is not a regular file yields 0 and a
/// `Path is not a file: <path>` diagnostic on stderr.
pub fn file_size(path: impl AsRef<Path>) -> u64 {
    file_size_with(path, &STDERR)
}

/// [`file_size`] reporting to `sink`.
pub fn file_size_with<D: DiagnosticSink + ?Sized>(path: impl AsRef<Path>, sink: &D) -> u64 {
    let path = path.as_ref();
    if !is_file(path) {
        sink.emit(&FsError::NotAFile { path: path.into() }.to_string());
        return 0;
    }
    platform::stat(path).map_or(0, |meta| meta.len())
}

/// Sum of the regular files directly inside `path` (depth cap 1).
pub fn directory_size<A: Allocator + ?Sized>(path: impl AsRef<Path>, allocator: &A) -> u64 {
    DirectorySize::new(path.as_ref(), allocator).run().bytes
}

/// Sum of the regular files under `path`, descending at most `max_depth`
/// levels (the root is level 1, 0 means unbounded).
///
/// A failure mid-walk is reported on stderr and the partial sum returned.
pub fn directory_size_bounded<A: Allocator + ?Sized>(
    path: impl AsRef<Path>,
    max_depth: u32,
    allocator: &A,
) -> u64 {
    DirectorySize::new(path.as_ref(), allocator)
        .max_depth(max_depth)
        .run()
        .bytes
}

/// Outcome of a directory walk.
#[derive(Debug)]
pub struct SizeReport {
    /// Bytes summed before the walk finished or stopped.
    pub bytes: u64,
    /// The fatal error that stopped the walk, if any.
    pub error: Option<FsError>,
}

impl SizeReport {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// The total if the walk completed, otherwise the error that stopped it.
    pub fn into_result(self) -> Result<u64, FsError> {
        match self.error {
            None => Ok(self.bytes),
            Some(err) => Err(err),
        }
    }
}

/// Builder for a bounded-depth directory walk.
///
/// ```no_run
/// use std::path::Path;
///
/// use fsutil_core::size::DirectorySize;
/// use fsutil_util::alloc::SystemAllocator;
///
/// let report = DirectorySize::new(Path::new("/var/log"), &SystemAllocator)
///     .max_depth(0)
///     .run();
/// println!("{} bytes", report.bytes);
/// ```
pub struct DirectorySize<'a, A: Allocator + ?Sized, D: DiagnosticSink + ?Sized = StderrSink> {
    root: &'a Path,
    max_depth: u32,
    allocator: &'a A,
    sink: &'a D,
}

impl<'a, A: Allocator + ?Sized> DirectorySize<'a, A> {
    /// Walk `root` with a depth cap of 1, reporting to stderr.
    pub fn new(root: &'a Path, allocator: &'a A) -> Self {
        Self {
            root,
            max_depth: 1,
            allocator,
            sink: &STDERR,
        }
    }
}

impl<'a, A: Allocator + ?Sized, D: DiagnosticSink + ?Sized> DirectorySize<'a, A, D> {
    /// Levels to descend, counting the root as 1. 0 means unbounded.
    pub fn max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Send diagnostics to `sink` instead of stderr.
    pub fn diagnostics<E: DiagnosticSink + ?Sized>(self, sink: &'a E) -> DirectorySize<'a, A, E> {
        DirectorySize {
            root: self.root,
            max_depth: self.max_depth,
            allocator: self.allocator,
            sink,
        }
    }

    /// Walk the tree.
    pub fn run(&self) -> SizeReport {
        let mut bytes = 0u64;

        if !is_directory(self.root) {
            let err = FsError::NotADirectory {
                path: self.root.into(),
            };
            self.sink.emit(&err.to_string());
            return SizeReport {
                bytes,
                error: Some(err),
            };
        }

        let mut frontier = Frontier::default();
        if let Err(err) = self.seed(&mut frontier) {
            return SizeReport {
                bytes,
                error: Some(err),
            };
        }

        while let Some(entry) = frontier.pop() {
            let drained = self.drain(&entry, &mut frontier, &mut bytes);
            drop(entry);
            if let Err(err) = drained {
                let released = frontier.release();
                tracing::debug!(
                    released,
                    bytes,
                    "walk of {} stopped early",
                    self.root.display()
                );
                return SizeReport {
                    bytes,
                    error: Some(err),
                };
            }
        }

        tracing::debug!(bytes, "walked {}", self.root.display());
        SizeReport { bytes, error: None }
    }

    fn seed(&self, frontier: &mut Frontier<'a, A>) -> Result<(), FsError> {
        let node = Reservation::new(self.allocator, Self::node_size())
            .map_err(|_| self.fatal(ALLOCATION_FAILED, FsError::OutOfMemory))?;
        let path = OwnedPath::new(self.root.as_os_str().to_os_string(), self.allocator)
            .map_err(|_| self.fatal(DUPLICATE_FAILED, FsError::OutOfMemory))?;
        frontier.push(FrontierEntry {
            path,
            depth: 1,
            _node: node,
        });
        Ok(())
    }

    /// Enumerate one directory: sum its files, queue admissible subdirectories.
    fn drain(
        &self,
        entry: &FrontierEntry<'a, A>,
        frontier: &mut Frontier<'a, A>,
        bytes: &mut u64,
    ) -> Result<(), FsError> {
        let stream = platform::open_dir(entry.path.as_path()).map_err(|e| {
            let err = FsError::OpenDirectory {
                path: entry.path.as_path().into(),
                code: platform::error_code(&e),
            };
            self.sink.emit(&err.to_string());
            err
        })?;
        tracing::trace!(depth = entry.depth, "opened {}", entry.path.display());

        for name in stream {
            if platform::is_pseudo_entry(&name) {
                continue;
            }
            let child = join(entry.path.as_os_str(), &name, self.allocator)
                .map_err(|_| self.fatal(JOIN_FAILED, FsError::OutOfMemory))?;

            if is_directory(&child) {
                if !admits(self.max_depth, entry.depth) {
                    tracing::trace!("depth cap reached at {}", child.display());
                    continue;
                }
                let node = Reservation::new(self.allocator, Self::node_size())
                    .map_err(|_| self.fatal(ALLOCATION_FAILED, FsError::OutOfMemory))?;
                frontier.push(FrontierEntry {
                    path: child,
                    depth: entry.depth + 1,
                    _node: node,
                });
            } else {
                *bytes = bytes.saturating_add(file_size_with(&child, self.sink));
            }
        }
        Ok(())
    }

    /// Bytes reserved per frontier entry, on top of its path.
    fn node_size() -> usize {
        std::mem::size_of::<FrontierEntry<'a, A>>()
    }

    fn fatal(&self, line: &str, err: FsError) -> FsError {
        self.sink.emit(line);
        err
    }
}

/// Whether a subdirectory found at `depth` may be queued.
fn admits(max_depth: u32, depth: u32) -> bool {
    max_depth == 0 || depth < max_depth
}

/// A directory waiting to be enumerated.
struct FrontierEntry<'a, A: Allocator + ?Sized> {
    path: OwnedPath<'a, A>,
    depth: u32,
    _node: Reservation<'a, A>,
}

/// Work list of pending directories. Order does not affect the sum.
struct Frontier<'a, A: Allocator + ?Sized> {
    entries: Vec<FrontierEntry<'a, A>>,
}

impl<A: Allocator + ?Sized> Default for Frontier<'_, A> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<'a, A: Allocator + ?Sized> Frontier<'a, A> {
    fn push(&mut self, entry: FrontierEntry<'a, A>) {
        self.entries.push(entry);
    }

    fn pop(&mut self) -> Option<FrontierEntry<'a, A>> {
        self.entries.pop()
    }

    /// Drop every pending entry, returning how many there were.
    /// Calling it again releases nothing.
    fn release(&mut self) -> usize {
        let pending = self.entries.len();
        self.entries.clear();
        pending
    }
}
