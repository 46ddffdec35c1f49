//! Subcommands. Each one turns its arguments into labeled items and an
//! action, then hands both to a [`BatchProcessor`].
//!
//! The builder-returning methods on each command are public so callers
//! (and tests) can attach their own report and output before processing.

pub mod collection;
pub mod dataset;
pub mod notification;
pub mod roles;

use std::fmt::Display;
use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::batch::{BatchProcessor, BatchProcessorBuilder, BatchSummary, ConsoleReport, LabeledItem};
use crate::config::Config;
use crate::consts::DEFAULT_DELAY_MS;
use crate::database::PgDatabase;
use crate::dataverse::DataverseClient;

pub use collection::{CollectionCmd, CollectionCommand};
pub use dataset::{DatasetCmd, DatasetCommand, RoleAssignmentCommand};
pub use notification::TruncateNotificationsCmd;
pub use roles::RoleArgs;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage Dataverse collections
    Collection(CollectionCmd),
    /// Manage Dataverse datasets
    Dataset(DatasetCmd),
    /// Remove user notifications but keep up to a specified amount
    TruncateNotifications(TruncateNotificationsCmd),
}

impl Command {
    pub async fn run(&self, config: &Config) -> Result<BatchSummary> {
        match self {
            Command::Collection(cmd) => cmd.run(&DataverseClient::new(&config.dataverse)?).await,
            Command::Dataset(cmd) => cmd.run(&DataverseClient::new(&config.dataverse)?).await,
            Command::TruncateNotifications(cmd) => {
                cmd.validate()?;
                let db = Arc::new(PgDatabase::connect(config.database()?).await?);
                let result = cmd.run(db.clone()).await;
                db.close().await;
                result
            }
        }
    }
}

/// Pacing shared by all batch commands.
#[derive(Debug, Clone, Args)]
pub struct DelayArgs {
    /// Delay in milliseconds between requests to the server
    #[arg(short, long, default_value_t = DEFAULT_DELAY_MS)]
    pub delay: u64,
}

/// Builder preset used by every command: given items, delay, item count in the
/// closing log line.
pub fn batch<V, R>(items: Vec<LabeledItem<V>>, delay: &DelayArgs) -> BatchProcessorBuilder<V, R> {
    BatchProcessor::builder()
        .items(items)
        .delay_ms(delay.delay)
        .announce_count(true)
}

/// Process with the console report: outcomes on stderr, action output on stdout.
pub async fn run_on_console<V, R>(builder: BatchProcessorBuilder<V, R>) -> Result<BatchSummary>
where
    V: Sync,
    R: Display,
{
    builder.report(ConsoleReport::new()).build()?.process().await
}
