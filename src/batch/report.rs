//! Where per-item outcomes end up.

use std::fmt::Display;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::error::error_kind;

/// Receives the outcome of every item of a batch.
pub trait Report<V, R>: Send {
    fn report_success(&mut self, label: &str, value: &V, result: &R);
    fn report_failure(&mut self, label: &str, value: &V, error: &anyhow::Error);
}

/// Writes `label: OK. ` for successes and one `FAILED` line per failure.
///
/// Successes are not newline-terminated, so a run of them shares a line.
/// Both channels default to stderr, keeping stdout free for action output.
pub struct ConsoleReport {
    success: Box<dyn Write + Send>,
    failure: Box<dyn Write + Send>,
}

impl ConsoleReport {
    pub fn new() -> Self {
        Self::with_writers(io::stderr(), io::stderr())
    }

    pub fn with_writers(
        success: impl Write + Send + 'static,
        failure: impl Write + Send + 'static,
    ) -> Self {
        Self {
            success: Box::new(success),
            failure: Box::new(failure),
        }
    }
}

impl Default for ConsoleReport {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, R> Report<V, R> for ConsoleReport {
    fn report_success(&mut self, label: &str, _value: &V, _result: &R) {
        let _ = write!(self.success, "{label}: OK. ");
        let _ = self.success.flush();
    }

    fn report_failure(&mut self, label: &str, _value: &V, error: &anyhow::Error) {
        let _ = writeln!(
            self.failure,
            "{label}: FAILED: Exception type = {}, message = {error:#}",
            error_kind(error)
        );
        let _ = self.failure.flush();
    }
}

/// Reports through `tracing` instead of writing to the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReport;

impl<V, R> Report<V, R> for LogReport {
    fn report_success(&mut self, label: &str, _value: &V, _result: &R) {
        info!(label, "OK");
    }

    fn report_failure(&mut self, label: &str, _value: &V, error: &anyhow::Error) {
        warn!(label, kind = error_kind(error), "FAILED: {error:#}");
    }
}

/// A recorded outcome, see [`CapturingReport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success {
        label: String,
        result: String,
    },
    Failure {
        label: String,
        kind: &'static str,
        message: String,
    },
}

impl Outcome {
    pub fn label(&self) -> &str {
        match self {
            Outcome::Success { label, .. } | Outcome::Failure { label, .. } => label,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }
}

/// Keeps outcomes in memory. Clones share the same record, so a test can
/// hand one clone to the processor and inspect the other afterwards.
#[derive(Debug, Default, Clone)]
pub struct CapturingReport {
    outcomes: Arc<Mutex<Vec<Outcome>>>,
}

impl CapturingReport {
    pub fn outcomes(&self) -> Vec<Outcome> {
        self.outcomes.lock().unwrap().clone()
    }
}

impl<V, R: Display> Report<V, R> for CapturingReport {
    fn report_success(&mut self, label: &str, _value: &V, result: &R) {
        self.outcomes.lock().unwrap().push(Outcome::Success {
            label: label.to_string(),
            result: result.to_string(),
        });
    }

    fn report_failure(&mut self, label: &str, _value: &V, error: &anyhow::Error) {
        self.outcomes.lock().unwrap().push(Outcome::Failure {
            label: label.to_string(),
            kind: error_kind(error),
            message: format!("{error:#}"),
        });
    }
}

/// An in-memory writer whose clones share one buffer.
#[derive(Debug, Default, Clone)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock().unwrap()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
