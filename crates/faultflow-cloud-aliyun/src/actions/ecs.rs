//! ECS instance start/stop/reboot

use crate::client::{EcsApi, RpcRequest, fetch};
use crate::model::DescribeInstanceStatusResponse;
use async_trait::async_trait;
use faultflow_cloud::{
    ActionError, ActionFlags, ActionSpec, CloudError, FlagSpec, FlipWhen, Operation,
    OperationTable, RemoteStatus, ResourceAction, ResourceIdentity,
};

pub const INSTANCES: &str = "instances";

pub const RUNNING: &str = "Running";
pub const STOPPED: &str = "Stopped";

pub static SPEC: ActionSpec = ActionSpec {
    provider: "aliyun",
    kind: "ecs",
    short: "do some aliyun ecs operations, like stop, start, reboot",
    long: "Stop, start or reboot aliyun ecs instances. Starting running instances \
           stops them and stopping stopped instances starts them, so the same \
           command injects and recovers the fault.",
    example: "# stop instances which instance id is i-x,i-y
fault aliyun ecs --accessKeyId xxx --accessKeySecret yyy --regionId cn-qingdao --type stop --instances i-x,i-y

# start instances which instance id is i-x,i-y
fault aliyun ecs --accessKeyId xxx --accessKeySecret yyy --regionId cn-qingdao --type start --instances i-x,i-y

# reboot instances which instance id is i-x,i-y
fault aliyun ecs --accessKeyId xxx --accessKeySecret yyy --regionId cn-qingdao --type reboot --instances i-x,i-y",
    flags: &[FlagSpec::new(INSTANCES, "the instances list, split by comma")],
    operations: OperationTable::new(&[
        Operation::flipping("start", "stop", FlipWhen::StatusIs(RUNNING)),
        Operation::flipping("stop", "start", FlipWhen::StatusIs(STOPPED)),
        Operation::plain("reboot"),
    ]),
};

pub struct Ecs;

/// Instance id to status for the given instances
pub async fn describe_instance_status(
    api: &dyn EcsApi,
    region_id: &str,
    instances: &[String],
) -> Result<RemoteStatus, CloudError> {
    let request = RpcRequest::new("DescribeInstanceStatus")
        .param("RegionId", region_id)
        .list("InstanceId", instances);
    let response: DescribeInstanceStatusResponse = fetch(api, request).await?;
    Ok(response
        .instance_statuses
        .instance_status
        .into_iter()
        .map(|s| (s.instance_id, s.status))
        .collect())
}

#[async_trait]
impl ResourceAction for Ecs {
    type Client = dyn EcsApi;
    type Target = Vec<String>;

    fn spec(&self) -> &'static ActionSpec {
        &SPEC
    }

    fn resolve(&self, flags: &ActionFlags, _operation: &Operation) -> Result<Vec<String>, ActionError> {
        flags.require_list(INSTANCES)
    }

    fn probe_keys(&self, target: &Vec<String>) -> Vec<String> {
        target.clone()
    }

    async fn probe(
        &self,
        client: &Self::Client,
        identity: &ResourceIdentity,
        target: &Vec<String>,
        _operation: &Operation,
    ) -> Result<RemoteStatus, CloudError> {
        describe_instance_status(client, &identity.region_id, target).await
    }

    async fn mutate(
        &self,
        client: &Self::Client,
        identity: &ResourceIdentity,
        target: &Vec<String>,
        operation: &'static str,
    ) -> Result<(), CloudError> {
        let action = match operation {
            "start" => "StartInstances",
            "stop" => "StopInstances",
            "reboot" => "RebootInstances",
            other => {
                return Err(CloudError::InvalidConfig(format!(
                    "unsupported ecs operation: {}",
                    other
                )));
            }
        };
        let request = RpcRequest::new(action)
            .param("RegionId", &identity.region_id)
            .list("InstanceId", target);
        client.call(request).await?;
        tracing::info!(action, instances = ?target, "ecs instances updated");
        Ok(())
    }
}
