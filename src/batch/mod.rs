//! The batch engine: runs one action over an ordered list of labeled items,
//! reports every outcome and keeps going when an item fails.
//!
//! Items are processed one at a time on the calling task. Between two items
//! the processor pauses for the configured delay so the remote service is
//! not flooded; the pause is skipped after the last item.

pub mod report;

use std::fmt::Display;
use std::io::{self, Write};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use futures::future::BoxFuture;
use tracing::{debug, info};

use crate::consts::DEFAULT_DELAY_MS;
use crate::error::BatchError;

pub use report::{CapturingReport, ConsoleReport, LogReport, Outcome, Report, SharedBuffer};

/// One unit of batch work: a display label and the value the action runs on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledItem<V> {
    label: String,
    value: V,
}

impl<V> LabeledItem<V> {
    pub fn new(label: impl Into<String>, value: V) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn into_value(self) -> V {
        self.value
    }
}

impl<S: Into<String>, V> From<(S, V)> for LabeledItem<V> {
    fn from((label, value): (S, V)) -> Self {
        Self::new(label, value)
    }
}

/// The work done for a single item. Errors are reported, not propagated.
#[async_trait]
pub trait Action<V, R>: Send + Sync {
    async fn apply(&self, value: &V) -> Result<R>;
}

#[async_trait]
impl<V, R, F> Action<V, R> for F
where
    V: Sync + 'static,
    R: Send + 'static,
    F: Fn(&V) -> Result<R> + Send + Sync,
{
    async fn apply(&self, value: &V) -> Result<R> {
        self(value)
    }
}

/// Adapts an async closure into an [`Action`]. See [`from_async_fn`].
pub struct AsyncFn<F>(F);

/// Wrap a closure returning a boxed future, e.g.
/// `from_async_fn(|c: &CollectionApi| c.storage_size().boxed())`.
pub fn from_async_fn<V, R, F>(f: F) -> AsyncFn<F>
where
    F: for<'a> Fn(&'a V) -> BoxFuture<'a, Result<R>> + Send + Sync,
{
    AsyncFn(f)
}

#[async_trait]
impl<V, R, F> Action<V, R> for AsyncFn<F>
where
    V: Sync + 'static,
    R: Send + 'static,
    F: for<'a> Fn(&'a V) -> BoxFuture<'a, Result<R>> + Send + Sync,
{
    async fn apply(&self, value: &V) -> Result<R> {
        (self.0)(value).await
    }
}

/// Counts of one finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Collects the configuration of a [`BatchProcessor`].
pub struct BatchProcessorBuilder<V, R> {
    items: Vec<LabeledItem<V>>,
    action: Option<Box<dyn Action<V, R>>>,
    report: Option<Box<dyn Report<V, R>>>,
    delay: Duration,
    output: Box<dyn Write + Send>,
    announce_count: bool,
}

impl<V, R> Default for BatchProcessorBuilder<V, R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            action: None,
            report: None,
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
            output: Box::new(io::stdout()),
            announce_count: false,
        }
    }
}

impl<V, R> BatchProcessorBuilder<V, R> {
    /// Items to process, in order. Accepts `LabeledItem`s or `(label, value)` pairs.
    pub fn items<I, T>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<LabeledItem<V>>,
    {
        self.items = items.into_iter().map(Into::into).collect();
        self
    }

    pub fn action(mut self, action: impl Action<V, R> + 'static) -> Self {
        self.action = Some(Box::new(action));
        self
    }

    pub fn report(mut self, report: impl Report<V, R> + 'static) -> Self {
        self.report = Some(Box::new(report));
        self
    }

    /// Pause between items in milliseconds. Zero disables pausing.
    pub fn delay_ms(mut self, millis: u64) -> Self {
        self.delay = Duration::from_millis(millis);
        self
    }

    /// Where the displayable result of each successful action goes (stdout by default).
    pub fn output(mut self, output: impl Write + Send + 'static) -> Self {
        self.output = Box::new(output);
        self
    }

    /// Mention the number of items in the closing log line.
    pub fn announce_count(mut self, announce: bool) -> Self {
        self.announce_count = announce;
        self
    }

    /// Fails when no action was given. A missing report is only detected
    /// once there is an item to report on.
    pub fn build(self) -> Result<BatchProcessor<V, R>, BatchError> {
        let action = self.action.ok_or(BatchError::MissingAction)?;
        Ok(BatchProcessor {
            items: self.items,
            action,
            report: self.report,
            delay: self.delay,
            output: self.output,
            announce_count: self.announce_count,
        })
    }
}

/// Sequential driver over labeled items. Built once, consumed by [`process`](Self::process).
pub struct BatchProcessor<V, R> {
    items: Vec<LabeledItem<V>>,
    action: Box<dyn Action<V, R>>,
    report: Option<Box<dyn Report<V, R>>>,
    delay: Duration,
    output: Box<dyn Write + Send>,
    announce_count: bool,
}

impl<V, R> BatchProcessor<V, R> {
    pub fn builder() -> BatchProcessorBuilder<V, R> {
        BatchProcessorBuilder::default()
    }
}

impl<V, R> BatchProcessor<V, R>
where
    V: Sync,
    R: Display,
{
    /// Run the action on every item in order.
    ///
    /// Only a missing report makes this fail; errors returned by the action
    /// are handed to the report and the loop moves on.
    pub async fn process(mut self) -> Result<BatchSummary> {
        info!("Starting batch processing");

        let total = self.items.len();
        let mut summary = BatchSummary {
            total,
            ..BatchSummary::default()
        };

        for (index, item) in self.items.iter().enumerate() {
            info!("Processing item {} of {}", index + 1, total);

            let report = self.report.as_mut().ok_or(BatchError::MissingReport)?;

            match self.action.apply(item.value()).await {
                Ok(result) => {
                    report.report_success(item.label(), item.value(), &result);
                    let shown = result.to_string();
                    if !shown.is_empty() {
                        // Losing stdout must not stop the batch.
                        let _ = writeln!(self.output, "{shown}");
                        let _ = self.output.flush();
                    }
                    summary.succeeded += 1;
                }
                Err(e) => {
                    report.report_failure(item.label(), item.value(), &e);
                    summary.failed += 1;
                }
            }

            if index + 1 < total && !self.delay.is_zero() {
                debug!("Sleeping for {} ms", self.delay.as_millis());
                tokio::time::sleep(self.delay).await;
            }
        }

        if self.announce_count {
            info!("Finished batch processing of {} items", total);
        } else {
            info!("Finished batch processing");
        }
        Ok(summary)
    }
}
