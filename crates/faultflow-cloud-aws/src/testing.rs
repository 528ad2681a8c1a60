//! Recording EC2 fake used by the action tests

use crate::client::{Ec2Api, ObservedInstance};
use async_trait::async_trait;
use faultflow_cloud::{Channel, CloudError, ResourceIdentity};
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct FakeEc2 {
    instances: Vec<ObservedInstance>,
    fail_describe: Option<String>,
    calls: Mutex<Vec<(&'static str, Vec<String>)>>,
}

impl FakeEc2 {
    pub fn with_states(states: &[(&str, &str)]) -> Arc<Self> {
        Arc::new(Self {
            instances: states
                .iter()
                .map(|(id, state)| ObservedInstance {
                    instance_id: id.to_string(),
                    state: state.to_string(),
                })
                .collect(),
            ..Default::default()
        })
    }

    pub fn failing(code: &str) -> Arc<Self> {
        Arc::new(Self {
            fail_describe: Some(code.to_string()),
            ..Default::default()
        })
    }

    pub fn calls(&self) -> Vec<(&'static str, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str, ids: &[String]) {
        self.calls.lock().unwrap().push((call, ids.to_vec()));
    }
}

#[async_trait]
impl Ec2Api for FakeEc2 {
    async fn describe_instance_status(
        &self,
        instance_ids: &[String],
    ) -> Result<Vec<ObservedInstance>, CloudError> {
        self.record("DescribeInstanceStatus", instance_ids);
        if let Some(code) = &self.fail_describe {
            return Err(CloudError::Api {
                code: code.clone(),
                message: "describe rejected".to_string(),
            });
        }
        Ok(self
            .instances
            .iter()
            .filter(|i| instance_ids.contains(&i.instance_id))
            .cloned()
            .collect())
    }

    async fn start_instances(&self, instance_ids: &[String]) -> Result<(), CloudError> {
        self.record("StartInstances", instance_ids);
        Ok(())
    }

    async fn stop_instances(&self, instance_ids: &[String]) -> Result<(), CloudError> {
        self.record("StopInstances", instance_ids);
        Ok(())
    }

    async fn reboot_instances(&self, instance_ids: &[String]) -> Result<(), CloudError> {
        self.record("RebootInstances", instance_ids);
        Ok(())
    }
}

pub struct FakeChannel(pub Arc<FakeEc2>);

#[async_trait]
impl Channel for FakeChannel {
    type Client = dyn Ec2Api;

    fn provider(&self) -> &'static str {
        "aws"
    }

    async fn connect(&self, _identity: &ResourceIdentity) -> Result<Arc<dyn Ec2Api>, CloudError> {
        let client: Arc<dyn Ec2Api> = self.0.clone();
        Ok(client)
    }
}
