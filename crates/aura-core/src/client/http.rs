//! HTTP implementation of [`InstanceApi`] for the Neo4j Aura API
//!
//! Authentication uses the OAuth2 client-credentials grant. The bearer token
//! is cached and shared by clones of the client until shortly before it
//! expires.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::debug;
use url::Url;

use super::InstanceApi;
use super::types::{
    CreateInstanceRequest, CreatedInstance, DeletedInstance, InstanceDetails, InstanceSummary,
};
use crate::config::Config;
use crate::error::{ApiError, Result};

/// Default request timeout for Aura API calls
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Tokens are refreshed this long before their advertised expiry
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        Utc::now() + chrono::Duration::seconds(TOKEN_REFRESH_MARGIN_SECS) < self.expires_at
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    3600
}

/// Aura wraps every payload in `{"data": ...}`
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Client for the Aura instances API
#[derive(Clone)]
pub struct AuraClient {
    http: reqwest::Client,
    base_url: Url,
    token_url: Url,
    client_id: String,
    client_secret: String,
    token: Arc<RwLock<Option<CachedToken>>>,
}

impl std::fmt::Debug for AuraClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuraClient")
            .field("base_url", &self.base_url.as_str())
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

/// Builder for [`AuraClient`]
#[derive(Debug, Default)]
pub struct AuraClientBuilder {
    base_url: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    timeout: Option<Duration>,
}

impl AuraClientBuilder {
    /// Base URL of the API, e.g. `https://api.neo4j.io/v1`
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<AuraClient> {
        let raw = self
            .base_url
            .unwrap_or_else(|| crate::config::config::DEFAULT_API_URL.to_string());
        // Url::join drops the last segment unless the base ends in '/'
        let base_url = if raw.ends_with('/') {
            Url::parse(&raw)?
        } else {
            Url::parse(&format!("{}/", raw))?
        };
        let token_url = base_url.join("/oauth/token")?;

        let http = reqwest::Client::builder()
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .user_agent(concat!("aura-mcp/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(AuraClient {
            http,
            base_url,
            token_url,
            client_id: self.client_id.unwrap_or_default(),
            client_secret: self.client_secret.unwrap_or_default(),
            token: Arc::new(RwLock::new(None)),
        })
    }
}

impl AuraClient {
    pub fn builder() -> AuraClientBuilder {
        AuraClientBuilder::default()
    }

    /// Build a client from process configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::builder()
            .base_url(&config.api_url)
            .client_id(&config.client_id)
            .client_secret(&config.client_secret)
            .build()
    }

    /// Get a valid bearer token, exchanging credentials when the cache is stale
    async fn access_token(&self) -> Result<String> {
        // Check cache first
        {
            let token = self.token.read().await;
            if let Some(cached) = token.as_ref().filter(|t| t.is_fresh()) {
                return Ok(cached.access_token.clone());
            }
        }

        let mut token = self.token.write().await;
        // Another task may have refreshed while we waited for the lock
        if let Some(cached) = token.as_ref().filter(|t| t.is_fresh()) {
            return Ok(cached.access_token.clone());
        }

        debug!(url = %self.token_url, "Requesting Aura API token");
        let body = serde_urlencoded::to_string([("grant_type", "client_credentials")])
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        let response = self
            .http
            .post(self.token_url.clone())
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::AuthenticationFailed {
                message: format!("token request returned {}: {}", status.as_u16(), error_message(&body)),
            });
        }

        let parsed: TokenResponse = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("token response: {}", e)))?;

        let cached = CachedToken {
            access_token: parsed.access_token,
            expires_at: Utc::now() + chrono::Duration::seconds(parsed.expires_in),
        };
        let access_token = cached.access_token.clone();
        *token = Some(cached);
        Ok(access_token)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.base_url.join(path)?;
        debug!(method = %method, url = %url, "Aura API request");
        Ok(self.http.request(method, url))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let token = self.access_token().await?;
        let response = request.bearer_auth(token).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status.as_u16(), error_message(&body)));
        }

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        Ok(envelope.data)
    }
}

/// Extract the first error message from an Aura error body, falling back to the raw text
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.errors.into_iter().next())
        .map(|e| e.message)
        .unwrap_or_else(|| body.trim().to_string())
}

fn instance_path(instance_id: &str) -> String {
    format!("instances/{}", urlencode_segment(instance_id))
}

fn urlencode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes()).collect()
}

#[async_trait]
impl InstanceApi for AuraClient {
    async fn list_instances(&self) -> Result<Vec<InstanceSummary>> {
        let request = self.request(Method::GET, "instances")?;
        self.send(request).await
    }

    async fn get_instance(&self, instance_id: &str) -> Result<InstanceDetails> {
        let request = self.request(Method::GET, &instance_path(instance_id))?;
        self.send(request).await
    }

    async fn create_instance(&self, request: &CreateInstanceRequest) -> Result<CreatedInstance> {
        let builder = self.request(Method::POST, "instances")?.json(request);
        self.send(builder).await
    }

    async fn delete_instance(&self, instance_id: &str) -> Result<DeletedInstance> {
        let request = self.request(Method::DELETE, &instance_path(instance_id))?;
        self.send(request).await
    }
}
