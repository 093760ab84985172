//! Path string commands.

use miette::Result;

use fsutil_core::{current_dir, expand_user, join as join_path, to_native};
use fsutil_util::alloc::SystemAllocator;

pub fn expand(path: &str) -> Result<()> {
    let expanded = expand_user(path, &SystemAllocator)?;
    println!("{}", expanded.display());
    Ok(())
}

pub fn native(path: &str) -> Result<()> {
    let native = to_native(path, &SystemAllocator)?;
    println!("{}", native.display());
    Ok(())
}

pub fn join(left: &str, right: &str) -> Result<()> {
    let joined = join_path(left, right, &SystemAllocator)?;
    println!("{}", joined.display());
    Ok(())
}

pub fn cwd() -> Result<()> {
    let cwd = current_dir(&SystemAllocator)?;
    println!("{}", cwd.display());
    Ok(())
}
