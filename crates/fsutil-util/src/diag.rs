//! Human-readable diagnostic sinks.
//!
//! Diagnostics are single lines without the trailing newline; a sink decides
//! where they end up.

use std::io::Write;
use std::sync::Mutex;

/// Destination for one-line diagnostics.
pub trait DiagnosticSink {
    fn emit(&self, line: &str);
}

impl<D: DiagnosticSink + ?Sized> DiagnosticSink for &D {
    fn emit(&self, line: &str) {
        (**self).emit(line)
    }
}

/// Writes each line, newline-terminated, to the process standard error.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl DiagnosticSink for StderrSink {
    fn emit(&self, line: &str) {
        tracing::debug!(diagnostic = line);
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(stderr, "{line}");
    }
}

/// Records lines in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    lines: Mutex<Vec<String>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every line emitted so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.lines().is_empty()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|l| l.contains(needle))
    }
}

impl DiagnosticSink for CollectingSink {
    fn emit(&self, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.to_string());
        }
    }
}
