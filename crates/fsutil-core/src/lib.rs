//! Cross-platform filesystem utilities.
//!
//! Path manipulation, stat-backed path predicates, single-level directory
//! creation, home-directory expansion and bounded-depth directory size
//! calculation. Every returned path is reserved from a caller-supplied
//! [`Allocator`](fsutil_util::alloc::Allocator) and released through it on
//! drop.

pub mod config;
pub mod mkdir;
pub mod path;
pub mod platform;
pub mod predicates;
pub mod size;

pub use mkdir::{create_dir, mkdir};
pub use path::{expand_user, expand_user_with_home, join, to_native};
pub use platform::{current_dir, get_cwd, home_dir, PATH_DELIMITER};
pub use predicates::{
    exists, is_directory, is_file, is_readable, is_readable_and_writable, is_writable, PathKind,
};
pub use size::{
    directory_size, directory_size_bounded, file_size, file_size_with, DirectorySize, SizeReport,
};
