//! EC2 client used by the fault actions

use crate::error::sdk_error;
use async_trait::async_trait;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_ec2::Client;
use aws_sdk_ec2::config::Credentials;
use faultflow_cloud::{CloudError, ResourceIdentity};
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ec2ClientConfig {
    /// Overrides the regional endpoint (LocalStack and similar)
    pub endpoint_url: Option<String>,
    /// Per-operation timeout
    pub timeout: Duration,
}

impl Default for Ec2ClientConfig {
    fn default() -> Self {
        Self {
            endpoint_url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Instance id with the state name as EC2 reports it (`running`, `stopped`, ...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedInstance {
    pub instance_id: String,
    pub state: String,
}

#[async_trait]
pub trait Ec2Api: Send + Sync {
    async fn describe_instance_status(
        &self,
        instance_ids: &[String],
    ) -> Result<Vec<ObservedInstance>, CloudError>;

    async fn start_instances(&self, instance_ids: &[String]) -> Result<(), CloudError>;

    async fn stop_instances(&self, instance_ids: &[String]) -> Result<(), CloudError>;

    async fn reboot_instances(&self, instance_ids: &[String]) -> Result<(), CloudError>;
}

/// SDK-backed client bound to the invocation's region and key pair
pub struct AwsEc2 {
    client: Client,
}

impl AwsEc2 {
    pub async fn connect(
        config: &Ec2ClientConfig,
        identity: &ResourceIdentity,
    ) -> Result<Self, CloudError> {
        if let Some(url) = &config.endpoint_url {
            if !url.starts_with("https://") && !url.starts_with("http://") {
                return Err(CloudError::InvalidConfig(format!(
                    "invalid endpoint url: {}",
                    url
                )));
            }
        }

        let credentials = Credentials::new(
            identity.credentials.access_key_id.clone(),
            identity.credentials.access_key_secret.clone(),
            None,
            None,
            "faultflow",
        );
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(identity.region_id.clone()))
            .credentials_provider(credentials)
            .timeout_config(
                TimeoutConfig::builder()
                    .operation_timeout(config.timeout)
                    .build(),
            );
        if let Some(url) = &config.endpoint_url {
            loader = loader.endpoint_url(url);
        }
        let sdk_config = loader.load().await;

        Ok(Self {
            client: Client::new(&sdk_config),
        })
    }
}

#[async_trait]
impl Ec2Api for AwsEc2 {
    async fn describe_instance_status(
        &self,
        instance_ids: &[String],
    ) -> Result<Vec<ObservedInstance>, CloudError> {
        // stopped instances are only listed with include_all_instances
        let output = self
            .client
            .describe_instance_status()
            .set_instance_ids(Some(instance_ids.to_vec()))
            .include_all_instances(true)
            .send()
            .await
            .map_err(sdk_error)?;

        Ok(output
            .instance_statuses()
            .iter()
            .filter_map(|status| {
                let instance_id = status.instance_id()?.to_string();
                let state = status
                    .instance_state()
                    .and_then(|s| s.name())
                    .map(|name| name.as_str().to_string())
                    .unwrap_or_default();
                Some(ObservedInstance { instance_id, state })
            })
            .collect())
    }

    async fn start_instances(&self, instance_ids: &[String]) -> Result<(), CloudError> {
        self.client
            .start_instances()
            .set_instance_ids(Some(instance_ids.to_vec()))
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(())
    }

    async fn stop_instances(&self, instance_ids: &[String]) -> Result<(), CloudError> {
        self.client
            .stop_instances()
            .set_instance_ids(Some(instance_ids.to_vec()))
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(())
    }

    async fn reboot_instances(&self, instance_ids: &[String]) -> Result<(), CloudError> {
        self.client
            .reboot_instances()
            .set_instance_ids(Some(instance_ids.to_vec()))
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(())
    }
}
