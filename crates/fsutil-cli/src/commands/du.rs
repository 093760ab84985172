use std::path::Path;

use miette::Result;

use fsutil_core::size::DirectorySize;
use fsutil_util::alloc::SystemAllocator;
use fsutil_util::diag::CollectingSink;
use fsutil_util::errors::FsError;
use fsutil_util::progress::status_warn;

pub fn exec(path: &Path, max_depth: Option<u32>, strict: bool, raw: bool) -> Result<()> {
    let config = super::load_config();
    let max_depth = max_depth.unwrap_or(config.size.max_depth);
    let strict = strict || config.size.strict;

    tracing::debug!(max_depth, strict, "measuring {}", path.display());
    let sink = CollectingSink::new();
    let report = DirectorySize::new(path, &SystemAllocator)
        .max_depth(max_depth)
        .diagnostics(&sink)
        .run();

    match report.error {
        Some(err @ FsError::NotADirectory { .. }) => {
            super::replay(&sink, Some(&err));
            Err(err.into())
        }
        Some(err) if strict => {
            super::replay(&sink, Some(&err));
            print_total(report.bytes, path, raw, config.output.human_readable);
            Err(err.into())
        }
        error => {
            super::replay(&sink, None);
            print_total(report.bytes, path, raw, config.output.human_readable);
            if error.is_some() {
                status_warn("Partial", "walk stopped early; the total is incomplete");
            }
            Ok(())
        }
    }
}

fn print_total(bytes: u64, path: &Path, raw: bool, human_readable: bool) {
    println!(
        "{}\t{}",
        super::render_size(bytes, raw, human_readable),
        path.display()
    );
}
