use anyhow::Result;
use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::CONTENT_TYPE;

use super::{DataverseClient, RoleAssignment, RoleAssignments};

/// A collection (a "dataverse" in API paths), addressed by alias.
#[derive(Debug, Clone)]
pub struct CollectionApi {
    client: DataverseClient,
    alias: String,
}

impl CollectionApi {
    pub(super) fn new(client: DataverseClient, alias: &str) -> Self {
        Self {
            client,
            alias: alias.to_string(),
        }
    }

    pub async fn storage_size(&self) -> Result<String> {
        let url = self
            .client
            .url(&["api", "dataverses", self.alias.as_str(), "storagesize"], &[])?;
        self.client.send(self.client.request(Method::GET, url)).await
    }

    /// Create a dataset from dataset JSON. Each `(block, key)` pair is sent as
    /// an `X-Dataverse-mdkey.<block>` header for protected metadata blocks.
    pub async fn create_dataset(&self, json: &str, metadata_keys: &[(String, String)]) -> Result<String> {
        let url = self
            .client
            .url(&["api", "dataverses", self.alias.as_str(), "datasets"], &[])?;
        let mut request = self
            .client
            .request(Method::POST, url)
            .header(CONTENT_TYPE, "application/json")
            .body(json.to_string());
        for (block, key) in metadata_keys {
            request = request.header(format!("X-Dataverse-mdkey.{block}"), key);
        }
        self.client.send(request).await
    }
}

#[async_trait]
impl RoleAssignments for CollectionApi {
    async fn list_role_assignments(&self) -> Result<String> {
        let url = self
            .client
            .url(&["api", "dataverses", self.alias.as_str(), "assignments"], &[])?;
        self.client.send(self.client.request(Method::GET, url)).await
    }

    async fn assign_role(&self, assignment: &RoleAssignment) -> Result<String> {
        let url = self
            .client
            .url(&["api", "dataverses", self.alias.as_str(), "assignments"], &[])?;
        self.client
            .send(self.client.request(Method::POST, url).json(assignment))
            .await
    }
}
