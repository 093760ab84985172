//! Command dispatch and handler modules.

mod du;
mod mkdir;
mod paths;
mod size;
mod stat;

use miette::Result;

use fsutil_util::diag::{CollectingSink, DiagnosticSink, StderrSink};
use fsutil_util::errors::FsError;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Du {
            path,
            max_depth,
            strict,
            bytes,
        } => du::exec(&path, max_depth, strict, bytes),
        Command::Size { path, bytes } => size::exec(&path, bytes),
        Command::Stat { path } => stat::exec(&path),
        Command::Mkdir { path } => mkdir::exec(&path),
        Command::Expand { path } => paths::expand(&path),
        Command::Native { path } => paths::native(&path),
        Command::Join { left, right } => paths::join(&left, &right),
        Command::Cwd => paths::cwd(),
    }
}

/// Load the user configuration, falling back to defaults on error.
fn load_config() -> fsutil_core::config::GlobalConfig {
    fsutil_core::config::GlobalConfig::load().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config, using defaults: {e}");
        Default::default()
    })
}

fn render_size(bytes: u64, raw: bool, human_readable: bool) -> String {
    if raw || !human_readable {
        bytes.to_string()
    } else {
        fsutil_util::progress::format_size(bytes)
    }
}

/// Forward collected diagnostics to stderr, leaving out the line for
/// `raised`, which miette renders on exit.
fn replay(sink: &CollectingSink, raised: Option<&FsError>) {
    let raised = raised.map(ToString::to_string);
    for line in sink.lines() {
        if raised.as_deref() != Some(line.as_str()) {
            StderrSink.emit(&line);
        }
    }
}
