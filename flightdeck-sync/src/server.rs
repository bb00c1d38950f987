//! REST sync driver.
//!
//! Maps each driver operation onto one HTTP request against the
//! configured server:
//!
//! | operation | request |
//! |---|---|
//! | fetch   | `GET {base}{route}/{id}` |
//! | list    | `GET {base}{route}?k=v` |
//! | create  | `POST {base}{route}` |
//! | update  | `PUT {base}{route}/{id}` |
//! | destroy | `DELETE {base}{route}/{id}` |

use crate::driver::SyncDriver;
use crate::error::{SyncError, SyncResult};
use async_trait::async_trait;
use flightdeck_model::DriverKind;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Connection settings for [`ServerSync`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSyncConfig {
    /// Scheme, host and optional prefix, e.g. `https://builder.example.com`.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
    /// Sent as a bearer token when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

impl Default for ServerSyncConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 30,
            auth_token: None,
        }
    }
}

impl ServerSyncConfig {
    /// Loads a config from a JSON file. Missing keys take their defaults.
    pub fn load(path: &Path) -> SyncResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            SyncError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Sync driver talking JSON to a REST server.
pub struct ServerSync {
    config: ServerSyncConfig,
    client: Client,
}

impl ServerSync {
    pub fn new(config: ServerSyncConfig) -> SyncResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SyncError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    fn collection_url(&self, route: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            route.trim_matches('/')
        )
    }

    fn member_url(&self, route: &str, id: i64) -> String {
        format!("{}/{id}", self.collection_url(route))
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let request = self.client.request(method, url);
        match &self.config.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Sends the request and turns non-success statuses into errors.
    async fn send(&self, request: RequestBuilder, url: &str) -> SyncResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| SyncError::Network(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                debug!("Failed to read error body from {}: {}", url, e);
                String::new()
            }
        };
        Err(match status.as_u16() {
            404 => SyncError::NotFound(url.to_string()),
            401 | 403 => SyncError::Auth(format!("{status} from {url}: {body}")),
            code => SyncError::Server { status: code, body },
        })
    }

    async fn read_json<T: DeserializeOwned>(response: Response, url: &str) -> SyncResult<T> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| SyncError::Network(format!("read body from {url} failed: {e}")))?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl SyncDriver for ServerSync {
    fn kind(&self) -> DriverKind {
        DriverKind::Server
    }

    async fn fetch(&self, route: &str, id: i64) -> SyncResult<Value> {
        let url = self.member_url(route, id);
        debug!("GET {}", url);

        let response = self.send(self.request(Method::GET, &url), &url).await?;
        Self::read_json(response, &url).await
    }

    async fn list(&self, route: &str, query: &[(String, String)]) -> SyncResult<Vec<Value>> {
        let url = self.collection_url(route);
        debug!("GET {} ({} filters)", url, query.len());

        let mut request = self.request(Method::GET, &url);
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = self.send(request, &url).await?;
        Self::read_json(response, &url).await
    }

    async fn create(&self, route: &str, body: &Value) -> SyncResult<Value> {
        let url = self.collection_url(route);
        debug!("POST {}", url);

        let response = self
            .send(self.request(Method::POST, &url).json(body), &url)
            .await?;
        let created: Value = Self::read_json(response, &url).await?;

        info!("Created record at {}", url);
        Ok(created)
    }

    async fn update(&self, route: &str, id: i64, body: &Value) -> SyncResult<Value> {
        let url = self.member_url(route, id);
        debug!("PUT {}", url);

        let response = self
            .send(self.request(Method::PUT, &url).json(body), &url)
            .await?;
        let updated: Value = Self::read_json(response, &url).await?;

        info!("Updated record {}", url);
        Ok(updated)
    }

    async fn destroy(&self, route: &str, id: i64) -> SyncResult<()> {
        let url = self.member_url(route, id);
        debug!("DELETE {}", url);

        match self.send(self.request(Method::DELETE, &url), &url).await {
            Ok(_) => {
                info!("Deleted record {}", url);
                Ok(())
            }
            Err(SyncError::NotFound(_)) => {
                debug!("Record {} already gone", url);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
