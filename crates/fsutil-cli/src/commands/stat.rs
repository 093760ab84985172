use std::path::Path;

use miette::Result;

use fsutil_core::predicates::{
    exists, is_directory, is_file, is_readable, is_readable_and_writable, is_writable, PathKind,
};

pub fn exec(path: &Path) -> Result<()> {
    let kind = match PathKind::of(path) {
        PathKind::NotFound => "not found",
        PathKind::Directory => "directory",
        PathKind::File => "file",
        PathKind::Other => "other",
    };
    println!("kind: {kind}");
    for (name, value) in [
        ("exists", exists(path)),
        ("is-directory", is_directory(path)),
        ("is-file", is_file(path)),
        ("is-readable", is_readable(path)),
        ("is-writable", is_writable(path)),
        ("is-readable-and-writable", is_readable_and_writable(path)),
    ] {
        println!("{name}: {value}");
    }
    Ok(())
}
