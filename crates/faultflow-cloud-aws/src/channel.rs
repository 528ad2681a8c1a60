//! Channel that builds a fresh EC2 client per invocation

use crate::client::{AwsEc2, Ec2Api, Ec2ClientConfig};
use async_trait::async_trait;
use faultflow_cloud::{Channel, CloudError, ResourceIdentity};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct AwsChannel {
    config: Ec2ClientConfig,
}

impl AwsChannel {
    pub fn new(config: Ec2ClientConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Channel for AwsChannel {
    type Client = dyn Ec2Api;

    fn provider(&self) -> &'static str {
        "aws"
    }

    async fn connect(&self, identity: &ResourceIdentity) -> Result<Arc<dyn Ec2Api>, CloudError> {
        let client: Arc<dyn Ec2Api> = Arc::new(AwsEc2::connect(&self.config, identity).await?);
        Ok(client)
    }
}
