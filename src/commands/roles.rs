//! Role assignment actions shared by datasets and collections.

use std::future::Future;
use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use clap::Args;

use crate::batch::{Action, LabeledItem};
use crate::dataverse::RoleAssignments;
use crate::params::{RoleAssignmentParams, parse_assignment, read_parameter_file};

/// Result of assigning when the command line named no role.
pub const NO_ROLE_TO_ASSIGN: &str = "There was no role to assign.";

#[derive(Debug, Clone, Args)]
#[group(required = true, multiple = false)]
pub struct RoleArgs {
    /// Alias and role assignee (example: @dataverseAdmin=contributor)
    pub assignment: Option<String>,

    /// CSV file to read parameters from, with a header row naming the
    /// columns PID, ASSIGNEE and ROLE
    #[arg(short = 'f', long)]
    pub parameter_file: Option<PathBuf>,
}

impl RoleArgs {
    /// Items for a role batch. With a parameter file every row is an item;
    /// otherwise each target gets the command-line assignment. `targets` is
    /// only awaited in the latter case.
    pub async fn items<A>(
        &self,
        targets: impl Future<Output = Result<Vec<LabeledItem<A>>>>,
        resolve: impl Fn(&str) -> A,
    ) -> Result<Vec<LabeledItem<RoleAssignmentParams<A>>>> {
        if let Some(path) = &self.parameter_file {
            return Ok(read_parameter_file(path)?
                .into_iter()
                .map(|(id, assignment)| {
                    let target = resolve(&id);
                    LabeledItem::new(
                        id,
                        RoleAssignmentParams {
                            target,
                            assignment: Some(assignment),
                        },
                    )
                })
                .collect());
        }
        let assignment = self.assignment.as_deref().and_then(parse_assignment);
        Ok(targets
            .await?
            .into_iter()
            .map(|item| {
                let label = item.label().to_string();
                LabeledItem::new(
                    label,
                    RoleAssignmentParams {
                        target: item.into_value(),
                        assignment: assignment.clone(),
                    },
                )
            })
            .collect())
    }
}

pub struct ListRoleAssignments;

#[async_trait]
impl<A: RoleAssignments + 'static> Action<A, String> for ListRoleAssignments {
    async fn apply(&self, target: &A) -> Result<String> {
        target.list_role_assignments().await
    }
}

pub struct AssignRole;

#[async_trait]
impl<A: RoleAssignments + 'static> Action<RoleAssignmentParams<A>, String> for AssignRole {
    async fn apply(&self, params: &RoleAssignmentParams<A>) -> Result<String> {
        match &params.assignment {
            Some(assignment) => params.target.assign_role(assignment).await,
            None => Ok(NO_ROLE_TO_ASSIGN.to_string()),
        }
    }
}
