//! Azure Blob Storage access through a SAS URL.
//!
//! The configured URL is either a container URL
//! (`https://acct.blob.core.windows.net/container?sv=...`) or a blob URL
//! (`https://acct.blob.core.windows.net/container/criteria.json?sv=...`).
//! Requests go straight to the Blob REST API; the SAS token in the query
//! string is the only credential.

use tracing::info;

use crate::error::ClientError;
use crate::service::CriteriaStore;

/// The parts of a storage SAS URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageUrl {
    /// Scheme and host, e.g. `https://acct.blob.core.windows.net`.
    pub account_url: String,
    pub container: String,
    /// Blob path within the container, when the URL names one.
    pub blob: Option<String>,
    /// Query string without the leading `?`.
    pub sas_token: String,
}

impl StorageUrl {
    pub fn parse(url: &str) -> Result<Self, ClientError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ClientError::BlobUrl(
                "AZURE_BLOB_STORAGE_URL is not set or is empty".to_string(),
            ));
        }

        let (base, sas_token) = url.split_once('?').unwrap_or((url, ""));

        let (scheme, rest) = base
            .split_once("://")
            .filter(|(scheme, _)| *scheme == "https" || *scheme == "http")
            .ok_or_else(|| ClientError::BlobUrl(format!("not an http(s) URL: {base}")))?;

        let (host, path) = rest.split_once('/').unwrap_or((rest, ""));
        if host.is_empty() {
            return Err(ClientError::BlobUrl(format!("missing host: {base}")));
        }

        let path = path.trim_matches('/');
        let (container, blob) = match path.split_once('/') {
            Some((container, blob)) => (container, Some(blob.to_string())),
            None => (path, None),
        };
        if container.is_empty() {
            return Err(ClientError::BlobUrl(format!("missing container name: {base}")));
        }

        Ok(Self {
            account_url: format!("{scheme}://{host}"),
            container: container.to_string(),
            blob: blob.filter(|b| !b.is_empty()),
            sas_token: sas_token.to_string(),
        })
    }
}

pub struct BlobStore {
    agent: ureq::Agent,
    url: StorageUrl,
}

impl BlobStore {
    pub fn from_url(url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            agent: ureq::Agent::new_with_defaults(),
            url: StorageUrl::parse(url)?,
        })
    }

    pub fn storage_url(&self) -> &StorageUrl {
        &self.url
    }

    /// Full request URL for a blob in this container, SAS token included.
    pub fn blob_url(&self, blob_name: &str) -> String {
        let mut url = format!(
            "{}/{}/{}",
            self.url.account_url,
            self.url.container,
            blob_name.trim_start_matches('/')
        );
        if !self.url.sas_token.is_empty() {
            url.push('?');
            url.push_str(&self.url.sas_token);
        }
        url
    }

    /// Upload text as a block blob, overwriting any existing blob.
    pub fn upload_blob(
        &self,
        content: &str,
        blob_name: &str,
        content_type: &str,
    ) -> Result<(), ClientError> {
        info!(
            container = %self.url.container,
            blob_name,
            bytes = content.len(),
            "uploading blob"
        );

        self.agent
            .put(&self.blob_url(blob_name))
            .header("x-ms-blob-type", "BlockBlob")
            .header("Content-Type", content_type)
            .send(content)?;

        info!(blob_name, "blob uploaded");
        Ok(())
    }

    /// Download a blob as text.
    pub fn download_blob(&self, blob_name: &str) -> Result<String, ClientError> {
        info!(container = %self.url.container, blob_name, "downloading blob");

        let mut resp = self.agent.get(&self.blob_url(blob_name)).call()?;
        let text = resp.body_mut().read_to_string()?;

        info!(blob_name, bytes = text.len(), "blob downloaded");
        Ok(text)
    }
}

impl CriteriaStore for BlobStore {
    fn put_text(&self, name: &str, content: &str, content_type: &str) -> Result<(), ClientError> {
        self.upload_blob(content, name, content_type)
    }
}
