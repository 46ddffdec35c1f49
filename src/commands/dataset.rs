use anyhow::{Result, anyhow};
use clap::{Args, Subcommand};
use futures::FutureExt;

use super::roles::{AssignRole, ListRoleAssignments, RoleArgs};
use super::{DelayArgs, batch, run_on_console};
use crate::batch::{BatchProcessorBuilder, BatchSummary, LabeledItem, from_async_fn};
use crate::dataverse::{DatasetApi, DataverseClient};
use crate::params::RoleAssignmentParams;
use crate::targets::TargetSource;

#[derive(Debug, Args)]
pub struct DatasetCmd {
    /// Persistent or database id of a dataset, a file with ids, or `-` to read them from stdin
    pub targets: Option<String>,

    #[command(flatten)]
    pub delay: DelayArgs,

    #[command(subcommand)]
    pub command: DatasetCommand,
}

#[derive(Debug, Subcommand)]
pub enum DatasetCommand {
    /// Manage role assignments
    #[command(subcommand)]
    RoleAssignment(RoleAssignmentCommand),
    /// Delete the draft version of each dataset
    DeleteDraft,
    /// Get the latest version of each dataset
    GetVersion,
}

#[derive(Debug, Subcommand)]
pub enum RoleAssignmentCommand {
    /// List the role assignments of each dataset
    List,
    /// Assign a role on each dataset
    Add(RoleArgs),
}

impl DatasetCmd {
    pub async fn run(&self, client: &DataverseClient) -> Result<BatchSummary> {
        match &self.command {
            DatasetCommand::RoleAssignment(RoleAssignmentCommand::List) => {
                run_on_console(self.list_role_assignments(client).await?).await
            }
            DatasetCommand::RoleAssignment(RoleAssignmentCommand::Add(args)) => {
                run_on_console(self.assign_role(client, args).await?).await
            }
            DatasetCommand::DeleteDraft => {
                run_on_console(self.delete_draft(client).await?).await
            }
            DatasetCommand::GetVersion => run_on_console(self.get_version(client).await?).await,
        }
    }

    pub async fn datasets(
        &self,
        client: &DataverseClient,
    ) -> Result<Vec<LabeledItem<DatasetApi>>> {
        let targets = self
            .targets
            .as_deref()
            .ok_or_else(|| anyhow!("no dataset targets given"))?;
        Ok(TargetSource::parse(targets)
            .read()
            .await?
            .into_iter()
            .map(|id| {
                let api = client.dataset(&id);
                LabeledItem::new(id, api)
            })
            .collect())
    }

    pub async fn list_role_assignments(
        &self,
        client: &DataverseClient,
    ) -> Result<BatchProcessorBuilder<DatasetApi, String>> {
        Ok(batch(self.datasets(client).await?, &self.delay).action(ListRoleAssignments))
    }

    pub async fn assign_role(
        &self,
        client: &DataverseClient,
        args: &RoleArgs,
    ) -> Result<BatchProcessorBuilder<RoleAssignmentParams<DatasetApi>, String>> {
        let items = args
            .items(self.datasets(client), |id| client.dataset(id))
            .await?;
        Ok(batch(items, &self.delay).action(AssignRole))
    }

    pub async fn delete_draft(
        &self,
        client: &DataverseClient,
    ) -> Result<BatchProcessorBuilder<DatasetApi, String>> {
        Ok(batch(self.datasets(client).await?, &self.delay)
            .action(from_async_fn(|d: &DatasetApi| d.delete_draft().boxed())))
    }

    pub async fn get_version(
        &self,
        client: &DataverseClient,
    ) -> Result<BatchProcessorBuilder<DatasetApi, String>> {
        Ok(batch(self.datasets(client).await?, &self.delay)
            .action(from_async_fn(|d: &DatasetApi| d.get_version().boxed())))
    }
}
