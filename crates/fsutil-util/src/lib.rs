//! Shared utilities for fsutil.
//!
//! This crate provides the cross-cutting concerns used by the other fsutil
//! crates: error types, the caller-supplied allocator handle, diagnostic
//! sinks, and terminal status lines.

pub mod alloc;
pub mod diag;
pub mod errors;
pub mod progress;
