//! Channel that builds a fresh ECS client per invocation

use crate::client::{EcsApi, EcsClient, EcsClientConfig};
use async_trait::async_trait;
use faultflow_cloud::{Channel, CloudError, ResourceIdentity};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct AliyunChannel {
    config: EcsClientConfig,
}

impl AliyunChannel {
    pub fn new(config: EcsClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EcsClientConfig {
        &self.config
    }
}

#[async_trait]
impl Channel for AliyunChannel {
    type Client = dyn EcsApi;

    fn provider(&self) -> &'static str {
        "aliyun"
    }

    async fn connect(&self, identity: &ResourceIdentity) -> Result<Arc<dyn EcsApi>, CloudError> {
        let client = EcsClient::new(&self.config, &identity.credentials, &identity.region_id)?;
        tracing::debug!(endpoint = client.endpoint(), "aliyun client ready");
        let client: Arc<dyn EcsApi> = Arc::new(client);
        Ok(client)
    }
}
