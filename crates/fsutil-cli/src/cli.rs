//! CLI argument definitions for fsutil.
//!
//! Uses `clap` derive macros to define the full command surface. Each command
//! corresponds to a handler in the [`super::commands`] module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "fsutil",
    version,
    about = "Small cross-platform filesystem utilities",
    long_about = "fsutil exposes path joining, native-separator conversion, home-directory \
                  expansion, path predicates, single-level directory creation and \
                  bounded-depth directory size calculation."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sum the sizes of regular files under a directory
    Du {
        /// Directory to measure
        path: PathBuf,
        /// Levels to descend, counting the directory itself as 1 (0 = unbounded)
        #[arg(short = 'd', long)]
        max_depth: Option<u32>,
        /// Fail if the walk stops before finishing
        #[arg(long)]
        strict: bool,
        /// Print raw byte counts
        #[arg(long)]
        bytes: bool,
    },

    /// Print the size of a regular file
    Size {
        /// File to measure
        path: PathBuf,
        /// Print raw byte counts
        #[arg(long)]
        bytes: bool,
    },

    /// Print every path predicate
    Stat {
        /// Path to query
        path: PathBuf,
    },

    /// Create a single directory (parents must exist)
    Mkdir {
        /// Absolute path of the directory to create
        path: PathBuf,
    },

    /// Replace a leading `~` with the home directory
    Expand {
        /// Path to expand
        path: String,
    },

    /// Replace `/` with the native path delimiter
    Native {
        /// Path to convert
        path: String,
    },

    /// Join two paths with the native delimiter
    Join {
        /// Left-hand path
        left: String,
        /// Right-hand path
        right: String,
    },

    /// Print the current working directory
    Cwd,
}

pub fn parse() -> Cli {
    Cli::parse()
}
