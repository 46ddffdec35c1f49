use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use clap::{Args, Subcommand};
use futures::FutureExt;

use super::roles::{AssignRole, ListRoleAssignments, RoleArgs};
use super::{DelayArgs, batch, run_on_console};
use crate::batch::{Action, BatchProcessorBuilder, BatchSummary, LabeledItem, from_async_fn};
use crate::consts::DEFAULT_COLLECTION;
use crate::dataverse::{CollectionApi, DataverseClient};
use crate::params::RoleAssignmentParams;
use crate::targets::TargetSource;

#[derive(Debug, Args)]
pub struct CollectionCmd {
    /// Alias of a collection, a file with aliases, or `-` to read them from stdin
    #[arg(default_value = DEFAULT_COLLECTION)]
    pub targets: String,

    #[command(flatten)]
    pub delay: DelayArgs,

    #[command(subcommand)]
    pub command: CollectionCommand,
}

#[derive(Debug, Subcommand)]
pub enum CollectionCommand {
    /// Get the storage size of each collection
    GetStorageSize,
    /// Create a dataset in each collection
    CreateDataset {
        /// Dataset JSON file
        #[arg(long)]
        dataset: PathBuf,
        /// Key for a protected metadata block, as block=key
        #[arg(short = 'm', long = "mdkey", value_parser = parse_metadata_key)]
        metadata_keys: Vec<(String, String)>,
    },
    /// List the role assignments of each collection
    ListRoleAssignments,
    /// Assign a role on each collection
    AssignRole(RoleArgs),
}

fn parse_metadata_key(text: &str) -> Result<(String, String)> {
    let (block, key) = text
        .split_once('=')
        .ok_or_else(|| anyhow!("expected block=key, got {text:?}"))?;
    Ok((block.to_string(), key.to_string()))
}

impl CollectionCmd {
    pub async fn run(&self, client: &DataverseClient) -> Result<BatchSummary> {
        match &self.command {
            CollectionCommand::GetStorageSize => {
                run_on_console(self.storage_size(client).await?).await
            }
            CollectionCommand::CreateDataset {
                dataset,
                metadata_keys,
            } => {
                run_on_console(self.create_dataset(client, dataset, metadata_keys).await?).await
            }
            CollectionCommand::ListRoleAssignments => {
                run_on_console(self.list_role_assignments(client).await?).await
            }
            CollectionCommand::AssignRole(args) => {
                run_on_console(self.assign_role(client, args).await?).await
            }
        }
    }

    pub async fn collections(
        &self,
        client: &DataverseClient,
    ) -> Result<Vec<LabeledItem<CollectionApi>>> {
        Ok(TargetSource::parse(&self.targets)
            .read()
            .await?
            .into_iter()
            .map(|alias| {
                let api = client.collection(&alias);
                LabeledItem::new(alias, api)
            })
            .collect())
    }

    pub async fn storage_size(
        &self,
        client: &DataverseClient,
    ) -> Result<BatchProcessorBuilder<CollectionApi, String>> {
        Ok(batch(self.collections(client).await?, &self.delay)
            .action(from_async_fn(|c: &CollectionApi| c.storage_size().boxed())))
    }

    /// The dataset file is read once, before any collection is touched.
    pub async fn create_dataset(
        &self,
        client: &DataverseClient,
        dataset: &Path,
        metadata_keys: &[(String, String)],
    ) -> Result<BatchProcessorBuilder<CollectionApi, String>> {
        let json = tokio::fs::read_to_string(dataset)
            .await
            .with_context(|| format!("failed to read dataset file {}", dataset.display()))?;
        Ok(batch(self.collections(client).await?, &self.delay).action(CreateDataset {
            json,
            metadata_keys: metadata_keys.to_vec(),
        }))
    }

    pub async fn list_role_assignments(
        &self,
        client: &DataverseClient,
    ) -> Result<BatchProcessorBuilder<CollectionApi, String>> {
        Ok(batch(self.collections(client).await?, &self.delay).action(ListRoleAssignments))
    }

    pub async fn assign_role(
        &self,
        client: &DataverseClient,
        args: &RoleArgs,
    ) -> Result<BatchProcessorBuilder<RoleAssignmentParams<CollectionApi>, String>> {
        let items = args
            .items(self.collections(client), |alias| client.collection(alias))
            .await?;
        Ok(batch(items, &self.delay).action(AssignRole))
    }
}

struct CreateDataset {
    json: String,
    metadata_keys: Vec<(String, String)>,
}

#[async_trait]
impl Action<CollectionApi, String> for CreateDataset {
    async fn apply(&self, collection: &CollectionApi) -> Result<String> {
        collection
            .create_dataset(&self.json, &self.metadata_keys)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_key_needs_equals() {
        assert_eq!(
            parse_metadata_key("citation=abc").unwrap(),
            ("citation".to_string(), "abc".to_string())
        );
        assert!(parse_metadata_key("citation").is_err());
    }
}
