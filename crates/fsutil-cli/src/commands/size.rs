use std::path::Path;

use miette::Result;

use fsutil_core::predicates::is_file;
use fsutil_core::size::file_size_with;
use fsutil_util::diag::CollectingSink;
use fsutil_util::errors::FsError;

pub fn exec(path: &Path, raw: bool) -> Result<()> {
    let config = super::load_config();
    let sink = CollectingSink::new();
    let bytes = file_size_with(path, &sink);
    if bytes == 0 && !is_file(path) {
        let err = FsError::NotAFile { path: path.into() };
        super::replay(&sink, Some(&err));
        return Err(err.into());
    }
    super::replay(&sink, None);
    println!(
        "{}\t{}",
        super::render_size(bytes, raw, config.output.human_readable),
        path.display()
    );
    Ok(())
}
