//! Thin client for the Dataverse native API.
//!
//! Every call returns the JSON envelope of the response as text; callers
//! print it as-is. Non-2xx responses become [`ApiError`].

pub mod collection;
pub mod dataset;

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::DataverseConfig;
use crate::consts::API_KEY_HEADER;
use crate::error::ApiError;

pub use collection::CollectionApi;
pub use dataset::{DatasetApi, DatasetId};

/// A role granted to an assignee, e.g. `@dataverseAdmin` as `contributor`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub assignee: String,
    pub role: String,
}

/// Anything roles can be assigned on: datasets and collections.
#[async_trait]
pub trait RoleAssignments: Send + Sync {
    async fn list_role_assignments(&self) -> Result<String>;
    async fn assign_role(&self, assignment: &RoleAssignment) -> Result<String>;
}

#[derive(Clone)]
pub struct DataverseClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
}

impl fmt::Debug for DataverseClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataverseClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

impl DataverseClient {
    pub fn new(config: &DataverseConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("invalid base URL {:?}", config.base_url))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    /// Numeric ids address a dataset by database id, anything else by persistent id.
    pub fn dataset(&self, id: &str) -> DatasetApi {
        DatasetApi::new(self.clone(), DatasetId::parse(id))
    }

    pub fn collection(&self, alias: &str) -> CollectionApi {
        CollectionApi::new(self.clone(), alias)
    }

    fn url(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("base URL {} cannot carry a path", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!("{method} {url}");
        let request = self.http.request(method, url);
        match &self.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<String> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::from_body(status.as_u16(), &body).into());
        }
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str, api_key: Option<&str>) -> DataverseClient {
        DataverseClient::new(&DataverseConfig {
            base_url: base_url.to_string(),
            api_key: api_key.map(str::to_string),
            timeout_seconds: 5,
        })
        .unwrap()
    }

    #[test]
    fn url_appends_segments_to_base_path() {
        let c = client("https://demo.dataverse.nl/", None);
        let url = c.url(&["api", "dataverses", "root", "storagesize"], &[]).unwrap();
        assert_eq!(url.as_str(), "https://demo.dataverse.nl/api/dataverses/root/storagesize");

        let c = client("https://example.org/dv", None);
        let url = c.url(&["api", "info"], &[]).unwrap();
        assert_eq!(url.as_str(), "https://example.org/dv/api/info");
    }

    #[test]
    fn url_encodes_query() {
        let c = client("http://localhost:8080", None);
        let url = c
            .url(
                &["api", "datasets", ":persistentId", "assignments"],
                &[("persistentId", "doi:10.5072/FK2/ABC")],
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/api/datasets/:persistentId/assignments?persistentId=doi%3A10.5072%2FFK2%2FABC"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = DataverseClient::new(&DataverseConfig {
            base_url: "not a url".to_string(),
            api_key: None,
            timeout_seconds: 5,
        })
        .unwrap_err();
        assert!(err.to_string().contains("invalid base URL"));
    }

    #[test]
    fn debug_hides_api_key() {
        let c = client("http://localhost:8080", Some("super-secret"));
        let shown = format!("{c:?}");
        assert!(!shown.contains("super-secret"));
        assert!(shown.contains("***"));
    }
}
