use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Method, Url};

use super::{DataverseClient, RoleAssignment, RoleAssignments};

/// How a dataset is addressed in API paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetId {
    Database(i64),
    Persistent(String),
}

impl DatasetId {
    pub fn parse(id: &str) -> Self {
        match id.parse::<i64>() {
            Ok(n) => Self::Database(n),
            Err(_) => Self::Persistent(id.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DatasetApi {
    client: DataverseClient,
    id: DatasetId,
}

impl DatasetApi {
    pub(super) fn new(client: DataverseClient, id: DatasetId) -> Self {
        Self { client, id }
    }

    fn url(&self, tail: &[&str]) -> Result<Url> {
        match &self.id {
            DatasetId::Database(n) => {
                let n = n.to_string();
                let mut segments = vec!["api", "datasets", n.as_str()];
                segments.extend_from_slice(tail);
                self.client.url(&segments, &[])
            }
            DatasetId::Persistent(pid) => {
                let mut segments = vec!["api", "datasets", ":persistentId"];
                segments.extend_from_slice(tail);
                self.client.url(&segments, &[("persistentId", pid.as_str())])
            }
        }
    }

    /// Removes the draft version. Fails when the dataset has no draft.
    pub async fn delete_draft(&self) -> Result<String> {
        let url = self.url(&["versions", ":draft"])?;
        self.client
            .send(self.client.request(Method::DELETE, url))
            .await
    }

    pub async fn get_version(&self) -> Result<String> {
        let url = self.url(&["versions", ":latest"])?;
        self.client.send(self.client.request(Method::GET, url)).await
    }
}

#[async_trait]
impl RoleAssignments for DatasetApi {
    async fn list_role_assignments(&self) -> Result<String> {
        let url = self.url(&["assignments"])?;
        self.client.send(self.client.request(Method::GET, url)).await
    }

    async fn assign_role(&self, assignment: &RoleAssignment) -> Result<String> {
        let url = self.url(&["assignments"])?;
        self.client
            .send(self.client.request(Method::POST, url).json(assignment))
            .await
    }
}
