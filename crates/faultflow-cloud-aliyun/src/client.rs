//! ECS RPC client
//!
//! Every ECS action is a signed GET against the regional endpoint. The
//! [`EcsApi`] trait is the seam the resource actions are written against; the
//! real [`EcsClient`] sends over HTTPS, tests substitute a recording fake.

use crate::error::{AliyunError, Result};
use crate::signer::Signer;
use async_trait::async_trait;
use chrono::Utc;
use faultflow_cloud::{CloudError, Credentials};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::time::Duration;

/// Endpoint template, `{region}` is replaced by the region id
pub const DEFAULT_ENDPOINT: &str = "https://ecs.{region}.aliyuncs.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcsClientConfig {
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for EcsClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl EcsClientConfig {
    pub fn endpoint_for(&self, region_id: &str) -> String {
        self.endpoint
            .replace("{region}", region_id)
            .trim_end_matches('/')
            .to_string()
    }
}

/// One RPC action with its action-specific parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcRequest {
    pub action: &'static str,
    pub params: BTreeMap<String, String>,
}

impl RpcRequest {
    pub fn new(action: &'static str) -> Self {
        Self {
            action,
            params: BTreeMap::new(),
        }
    }

    pub fn param(mut self, name: &str, value: impl Into<String>) -> Self {
        self.params.insert(name.to_string(), value.into());
        self
    }

    /// Repeated parameter, sent as `Name.1`, `Name.2`, ...
    pub fn list<S: AsRef<str>>(mut self, name: &str, values: &[S]) -> Self {
        for (i, value) in values.iter().enumerate() {
            self.params
                .insert(format!("{}.{}", name, i + 1), value.as_ref().to_string());
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

#[async_trait]
pub trait EcsApi: Send + Sync {
    /// Issue one action and return the decoded JSON body
    async fn call(&self, request: RpcRequest) -> std::result::Result<serde_json::Value, CloudError>;
}

/// Issue `request` and decode the body into `T`
pub async fn fetch<T: DeserializeOwned>(
    api: &dyn EcsApi,
    request: RpcRequest,
) -> std::result::Result<T, CloudError> {
    let body = api.call(request).await?;
    Ok(serde_json::from_value(body)?)
}

/// Error body returned with non-2xx responses
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct ErrorBody {
    code: String,
    message: String,
    request_id: String,
}

/// HTTPS client bound to one region and key pair
pub struct EcsClient {
    http: reqwest::Client,
    endpoint: String,
    signer: Signer,
}

impl EcsClient {
    pub fn new(config: &EcsClientConfig, credentials: &Credentials, region_id: &str) -> Result<Self> {
        let endpoint = config.endpoint_for(region_id);
        if !endpoint.starts_with("https://") && !endpoint.starts_with("http://") {
            return Err(AliyunError::InvalidEndpoint(endpoint));
        }

        let http = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            endpoint,
            signer: Signer::new(
                credentials.access_key_id.clone(),
                credentials.access_key_secret.clone(),
            ),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn send(&self, request: RpcRequest) -> Result<serde_json::Value> {
        let nonce = uuid::Uuid::new_v4().to_string();
        let timestamp = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
        let query = self
            .signer
            .signed_query(request.action, request.params, &nonce, &timestamp)?;
        let url = format!("{}/?{}", self.endpoint, query);

        tracing::debug!(action = request.action, endpoint = %self.endpoint, "calling ecs api");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let error: ErrorBody = serde_json::from_str(&body).unwrap_or_default();
            return Err(AliyunError::Api {
                code: if error.code.is_empty() {
                    status.as_str().to_string()
                } else {
                    error.code
                },
                message: if error.message.is_empty() {
                    body
                } else {
                    error.message
                },
                request_id: error.request_id,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl EcsApi for EcsClient {
    async fn call(&self, request: RpcRequest) -> std::result::Result<serde_json::Value, CloudError> {
        Ok(self.send(request).await?)
    }
}
