use std::path::Path;

use miette::Result;

use fsutil_core::mkdir::create_dir;
use fsutil_util::progress::status;

pub fn exec(path: &Path) -> Result<()> {
    create_dir(path)?;
    status("Created", &path.display().to_string());
    Ok(())
}
