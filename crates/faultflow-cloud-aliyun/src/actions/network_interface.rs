//! Elastic network interface attach/detach

use crate::client::{EcsApi, RpcRequest, fetch};
use crate::model::DescribeNetworkInterfacesResponse;
use async_trait::async_trait;
use faultflow_cloud::{
    ActionError, ActionFlags, ActionSpec, CloudError, FlagSpec, FlipWhen, Operation,
    OperationTable, RemoteStatus, ResourceAction, ResourceIdentity,
};

pub const NETWORK_INTERFACE_ID: &str = "networkInterfaceId";
pub const INSTANCE_ID: &str = "instanceId";

pub const IN_USE: &str = "InUse";

pub static SPEC: ActionSpec = ActionSpec {
    provider: "aliyun",
    kind: "networkInterface",
    short: "do some aliyun networkInterface operations, like attach, detach",
    long: "Detach an elastic network interface from an ecs instance or attach it back.",
    example: "# attach networkInterface n-x to instance i-x
fault aliyun networkInterface --accessKeyId xxx --accessKeySecret yyy --regionId cn-qingdao --type attach --networkInterfaceId n-x --instanceId i-x

# detach networkInterface n-x from instance i-x
fault aliyun networkInterface --accessKeyId xxx --accessKeySecret yyy --regionId cn-qingdao --type detach --networkInterfaceId n-x --instanceId i-x",
    flags: &[
        FlagSpec::new(NETWORK_INTERFACE_ID, "the network interface id"),
        FlagSpec::new(INSTANCE_ID, "the instance id"),
    ],
    operations: OperationTable::new(&[
        Operation::flipping("attach", "detach", FlipWhen::StatusIs(IN_USE)),
        Operation::flipping("detach", "attach", FlipWhen::StatusIsNot(IN_USE)),
    ]),
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkInterfaceTarget {
    pub network_interface_id: String,
    pub instance_id: String,
}

pub struct NetworkInterface;

#[async_trait]
impl ResourceAction for NetworkInterface {
    type Client = dyn EcsApi;
    type Target = NetworkInterfaceTarget;

    fn spec(&self) -> &'static ActionSpec {
        &SPEC
    }

    fn resolve(
        &self,
        flags: &ActionFlags,
        _operation: &Operation,
    ) -> Result<NetworkInterfaceTarget, ActionError> {
        Ok(NetworkInterfaceTarget {
            network_interface_id: flags.require(NETWORK_INTERFACE_ID)?.to_string(),
            instance_id: flags.require(INSTANCE_ID)?.to_string(),
        })
    }

    fn probe_keys(&self, target: &NetworkInterfaceTarget) -> Vec<String> {
        vec![target.network_interface_id.clone()]
    }

    async fn probe(
        &self,
        client: &Self::Client,
        identity: &ResourceIdentity,
        target: &NetworkInterfaceTarget,
        _operation: &Operation,
    ) -> Result<RemoteStatus, CloudError> {
        let request = RpcRequest::new("DescribeNetworkInterfaces")
            .param("RegionId", &identity.region_id)
            .param("InstanceId", &target.instance_id)
            .list("NetworkInterfaceId", &[&target.network_interface_id]);
        let response: DescribeNetworkInterfacesResponse = fetch(client, request).await?;
        Ok(response
            .network_interface_sets
            .network_interface_set
            .into_iter()
            .map(|n| (n.network_interface_id, n.status))
            .collect())
    }

    async fn mutate(
        &self,
        client: &Self::Client,
        identity: &ResourceIdentity,
        target: &NetworkInterfaceTarget,
        operation: &'static str,
    ) -> Result<(), CloudError> {
        let action = match operation {
            "attach" => "AttachNetworkInterface",
            "detach" => "DetachNetworkInterface",
            other => {
                return Err(CloudError::InvalidConfig(format!(
                    "unsupported networkInterface operation: {}",
                    other
                )));
            }
        };
        let request = RpcRequest::new(action)
            .param("RegionId", &identity.region_id)
            .param("NetworkInterfaceId", &target.network_interface_id)
            .param("InstanceId", &target.instance_id);
        client.call(request).await?;
        Ok(())
    }
}
