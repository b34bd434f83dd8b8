//! REST implementation of the catalog client
//!
//! Talks JSON to the catalog collaborator over HTTP with a token header and
//! a shared connection-pooled client. All transport failures are mapped onto
//! [`CatalogError`]; the pipeline itself never retries.
//!
//! # Example
//!
//! ```no_run
//! use setforge::catalog::{CatalogClient, RestCatalogClient};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = RestCatalogClient::with_timeout(
//!     "https://catalog.example.com/api".to_string(),
//!     "token-123".to_string(),
//!     Duration::from_secs(60),
//! );
//!
//! if client.health_check().await? {
//!     let entry = client.get_entry("entry-1").await?;
//!     println!("{}", entry.title);
//! }
//! # Ok(())
//! # }
//! ```

use super::client::CatalogClient;
use super::error::CatalogError;
use super::types::{CatalogEntry, EntryDraft, EntryPatch};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default request timeout for catalog API calls
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Header carrying the access token
const TOKEN_HEADER: &str = "X-Catalog-Access-Token";

/// HTTP client for the external catalog API.
///
/// Thread-safe; share across tasks with `Arc`.
pub struct RestCatalogClient {
    /// Catalog API base URL, without trailing slash
    endpoint: String,

    /// Access token sent on every request
    token: String,

    /// Shared HTTP client with connection pooling
    http_client: Client,

    /// Request timeout duration
    timeout: Duration,
}

#[derive(Serialize)]
struct AttributeBody<'a> {
    value: &'a str,
}

impl RestCatalogClient {
    pub fn new(endpoint: String, token: String) -> Self {
        Self::with_timeout(endpoint, token, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(endpoint: String, token: String, timeout: Duration) -> Self {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token,
            http_client,
            timeout,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    fn map_transport_error(&self, e: reqwest::Error) -> CatalogError {
        if e.is_timeout() {
            CatalogError::Timeout(self.timeout.as_secs())
        } else if e.is_connect() {
            CatalogError::Network(format!("cannot connect to {}: {}", self.endpoint, e))
        } else {
            CatalogError::Network(e.to_string())
        }
    }

    async fn check_status(&self, response: Response) -> Result<Response, CatalogError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        let body = response.text().await.unwrap_or_default();

        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                CatalogError::Authentication(body)
            }
            StatusCode::NOT_FOUND => CatalogError::NotFound(body),
            StatusCode::TOO_MANY_REQUESTS => CatalogError::RateLimited { retry_after },
            _ => CatalogError::Api {
                message: body,
                status: Some(status.as_u16()),
            },
        })
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T, CatalogError> {
        response
            .json::<T>()
            .await
            .map_err(|e| CatalogError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl CatalogClient for RestCatalogClient {
    async fn get_entry(&self, id: &str) -> Result<CatalogEntry, CatalogError> {
        debug!("Fetching catalog entry {}", id);
        let response = self
            .http_client
            .get(self.url(&format!("/entries/{}", id)))
            .header(TOKEN_HEADER, &self.token)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;
        let response = self.check_status(response).await?;
        self.decode(response).await
    }

    async fn create_entry(&self, draft: EntryDraft) -> Result<CatalogEntry, CatalogError> {
        debug!("Creating catalog entry '{}'", draft.title);
        let response = self
            .http_client
            .post(self.url("/entries"))
            .header(TOKEN_HEADER, &self.token)
            .json(&draft)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;
        let response = self.check_status(response).await?;
        let created: CatalogEntry = self.decode(response).await?;
        info!("Created catalog entry {} ('{}')", created.id, created.title);
        Ok(created)
    }

    async fn update_entry(
        &self,
        id: &str,
        patch: EntryPatch,
    ) -> Result<CatalogEntry, CatalogError> {
        debug!("Updating catalog entry {}", id);
        let response = self
            .http_client
            .put(self.url(&format!("/entries/{}", id)))
            .header(TOKEN_HEADER, &self.token)
            .json(&patch)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;
        let response = self.check_status(response).await?;
        self.decode(response).await
    }

    async fn list_entries(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        debug!("Listing catalog entries");
        let response = self
            .http_client
            .get(self.url("/entries"))
            .header(TOKEN_HEADER, &self.token)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;
        let response = self.check_status(response).await?;
        self.decode(response).await
    }

    async fn set_attribute(
        &self,
        entry_id: &str,
        namespace: &str,
        key: &str,
        value: &str,
    ) -> Result<(), CatalogError> {
        debug!("Setting attribute {}/{} on {}", namespace, key, entry_id);
        let response = self
            .http_client
            .put(self.url(&format!(
                "/entries/{}/attributes/{}/{}",
                entry_id, namespace, key
            )))
            .header(TOKEN_HEADER, &self.token)
            .json(&AttributeBody { value })
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;
        self.check_status(response).await?;
        Ok(())
    }

    async fn delete_attribute(
        &self,
        entry_id: &str,
        namespace: &str,
        key: &str,
    ) -> Result<(), CatalogError> {
        debug!("Deleting attribute {}/{} on {}", namespace, key, entry_id);
        let response = self
            .http_client
            .delete(self.url(&format!(
                "/entries/{}/attributes/{}/{}",
                entry_id, namespace, key
            )))
            .header(TOKEN_HEADER, &self.token)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;
        self.check_status(response).await?;
        Ok(())
    }

    async fn delete_entry(&self, id: &str) -> Result<(), CatalogError> {
        debug!("Deleting catalog entry {}", id);
        let response = self
            .http_client
            .delete(self.url(&format!("/entries/{}", id)))
            .header(TOKEN_HEADER, &self.token)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;
        self.check_status(response).await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "RestCatalog"
    }

    /// Lightweight availability probe against the `/health` endpoint.
    ///
    /// Returns `Ok(false)` for unreachable or unhealthy upstreams rather than
    /// an error, so callers can degrade gracefully.
    async fn health_check(&self) -> Result<bool, CatalogError> {
        let url = self.url("/health");
        debug!("Checking catalog health at {}", url);

        match self.http_client.get(&url).send().await {
            Ok(response) => {
                let is_healthy = response.status().is_success();
                if is_healthy {
                    info!("Catalog health check successful");
                } else {
                    warn!(
                        "Catalog health check failed with status: {}",
                        response.status()
                    );
                }
                Ok(is_healthy)
            }
            Err(e) if e.is_timeout() || e.is_connect() => {
                warn!("Catalog unreachable at {}: {}", self.endpoint, e);
                Ok(false)
            }
            Err(e) => Err(CatalogError::Network(format!("Health check failed: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_is_normalized() {
        let client = RestCatalogClient::new(
            "https://catalog.example.com/api/".to_string(),
            "t".to_string(),
        );
        assert_eq!(
            client.url("/entries/e1"),
            "https://catalog.example.com/api/entries/e1"
        );
    }

    #[test]
    fn test_name() {
        let client = RestCatalogClient::new("http://localhost:9999".to_string(), "t".to_string());
        assert_eq!(client.name(), "RestCatalog");
    }
}
