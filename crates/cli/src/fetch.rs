//! Remote catalog source.
//!
//! Seeds an empty terminal from the demo product listing. The fetch is a
//! single GET with no retry; callers fall back to an empty catalog on failure.

use nexus_pos_core::{Catalog, CategoryRule, RemoteListing};
use thiserror::Error;
use url::Url;

/// Errors that can occur when fetching the remote catalog.
#[derive(Debug, Error)]
pub enum CatalogFetchError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The listing answered with a non-success status.
    #[error("catalog source returned {0}")]
    Status(reqwest::StatusCode),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Client for the remote product listing.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    url: Url,
    rule: CategoryRule,
}

impl CatalogClient {
    #[must_use]
    pub fn new(url: Url, rule: CategoryRule) -> Self {
        Self::with_client(reqwest::Client::new(), url, rule)
    }

    #[must_use]
    pub const fn with_client(client: reqwest::Client, url: Url, rule: CategoryRule) -> Self {
        Self { client, url, rule }
    }

    /// Fetch the listing and map it into a catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogFetchError` if the request fails, the status is not a
    /// success, or the body is not a product listing.
    #[tracing::instrument(skip(self), fields(url = %self.url))]
    pub async fn fetch(&self) -> Result<Catalog, CatalogFetchError> {
        let response = self.client.get(self.url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogFetchError::Status(status));
        }

        let body = response.text().await?;
        let listing: RemoteListing = serde_json::from_str(&body)?;
        let catalog = Catalog::from_remote(listing, &self.rule);
        tracing::info!(products = catalog.len(), "Fetched remote catalog");
        Ok(catalog)
    }
}
