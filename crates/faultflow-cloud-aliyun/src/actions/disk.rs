//! Cloud disk attach/detach

use crate::client::{EcsApi, RpcRequest, fetch};
use crate::model::DescribeDisksResponse;
use async_trait::async_trait;
use faultflow_cloud::{
    ActionError, ActionFlags, ActionSpec, CloudError, FlagSpec, FlipWhen, Operation,
    OperationTable, RemoteStatus, ResourceAction, ResourceIdentity,
};

pub const DISK_ID: &str = "diskId";
pub const INSTANCE_ID: &str = "instanceId";

pub const IN_USE: &str = "In_use";

pub static SPEC: ActionSpec = ActionSpec {
    provider: "aliyun",
    kind: "disk",
    short: "do some aliyun disk operations, like detach, attach",
    long: "Detach a cloud disk from an ecs instance or attach it back.",
    example: "# detach disk d-x from instance i-x
fault aliyun disk --accessKeyId xxx --accessKeySecret yyy --regionId cn-hangzhou --type detach --instanceId i-x --diskId d-x

# attach disk d-x to instance i-x
fault aliyun disk --accessKeyId xxx --accessKeySecret yyy --regionId cn-hangzhou --type attach --instanceId i-x --diskId d-x",
    flags: &[
        FlagSpec::new(DISK_ID, "the disk id"),
        FlagSpec::new(INSTANCE_ID, "the instance id"),
    ],
    operations: OperationTable::new(&[
        Operation::flipping("detach", "attach", FlipWhen::StatusIsNot(IN_USE)),
        Operation::flipping("attach", "detach", FlipWhen::StatusIs(IN_USE)),
    ]),
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskTarget {
    pub disk_id: String,
    pub instance_id: String,
}

pub struct Disk;

#[async_trait]
impl ResourceAction for Disk {
    type Client = dyn EcsApi;
    type Target = DiskTarget;

    fn spec(&self) -> &'static ActionSpec {
        &SPEC
    }

    fn resolve(&self, flags: &ActionFlags, _operation: &Operation) -> Result<DiskTarget, ActionError> {
        Ok(DiskTarget {
            disk_id: flags.require(DISK_ID)?.to_string(),
            instance_id: flags.require(INSTANCE_ID)?.to_string(),
        })
    }

    fn probe_keys(&self, target: &DiskTarget) -> Vec<String> {
        vec![target.disk_id.clone()]
    }

    async fn probe(
        &self,
        client: &Self::Client,
        identity: &ResourceIdentity,
        target: &DiskTarget,
        _operation: &Operation,
    ) -> Result<RemoteStatus, CloudError> {
        let request = RpcRequest::new("DescribeDisks")
            .param("RegionId", &identity.region_id)
            .param("InstanceId", &target.instance_id);
        let response: DescribeDisksResponse = fetch(client, request).await?;
        Ok(response
            .disks
            .disk
            .into_iter()
            .map(|d| (d.disk_id, d.status))
            .collect())
    }

    async fn mutate(
        &self,
        client: &Self::Client,
        _identity: &ResourceIdentity,
        target: &DiskTarget,
        operation: &'static str,
    ) -> Result<(), CloudError> {
        let request = match operation {
            "attach" => RpcRequest::new("AttachDisk"),
            "detach" => RpcRequest::new("DetachDisk").param("DeleteWithInstance", "false"),
            other => {
                return Err(CloudError::InvalidConfig(format!(
                    "unsupported disk operation: {}",
                    other
                )));
            }
        };
        client
            .call(
                request
                    .param("InstanceId", &target.instance_id)
                    .param("DiskId", &target.disk_id),
            )
            .await?;
        Ok(())
    }
}
