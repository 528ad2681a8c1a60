//! Secondary private IP unassign/assign on a network interface

use crate::client::{EcsApi, RpcRequest, fetch};
use crate::model::NetworkInterfaceAttribute;
use async_trait::async_trait;
use faultflow_cloud::{
    ActionError, ActionFlags, ActionSpec, CloudError, FlagSpec, FlipWhen, Operation,
    OperationTable, RemoteStatus, ResourceAction, ResourceIdentity,
};

pub const NETWORK_INTERFACE_ID: &str = "networkInterfaceId";
pub const PRIVATE_IP_ADDRESS: &str = "privateIpAddress";

/// Status reported for every address bound to the interface
pub const ASSIGNED: &str = "Assigned";

pub static SPEC: ActionSpec = ActionSpec {
    provider: "aliyun",
    kind: "privateIp",
    short: "do some aliyun private ip operations, like unassign, assign",
    long: "Unassign secondary private ip addresses from a network interface or assign them back.",
    example: "# unassign private ip 1.1.1.1,2.2.2.2 from networkInterface n-x
fault aliyun privateIp --accessKeyId xxx --accessKeySecret yyy --regionId cn-qingdao --type unassign --networkInterfaceId n-x --privateIpAddress 1.1.1.1,2.2.2.2

# assign private ip 1.1.1.1 to networkInterface n-x
fault aliyun privateIp --accessKeyId xxx --accessKeySecret yyy --regionId cn-qingdao --type assign --networkInterfaceId n-x --privateIpAddress 1.1.1.1",
    flags: &[
        FlagSpec::new(NETWORK_INTERFACE_ID, "the network interface id"),
        FlagSpec::new(PRIVATE_IP_ADDRESS, "the private ip address list, split by comma"),
    ],
    operations: OperationTable::new(&[
        Operation::flipping("unassign", "assign", FlipWhen::StatusIsNot(ASSIGNED)),
        Operation::flipping("assign", "unassign", FlipWhen::StatusIs(ASSIGNED)),
    ]),
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateIpTarget {
    pub network_interface_id: String,
    pub addresses: Vec<String>,
}

pub struct PrivateIp;

#[async_trait]
impl ResourceAction for PrivateIp {
    type Client = dyn EcsApi;
    type Target = PrivateIpTarget;

    fn spec(&self) -> &'static ActionSpec {
        &SPEC
    }

    fn resolve(
        &self,
        flags: &ActionFlags,
        _operation: &Operation,
    ) -> Result<PrivateIpTarget, ActionError> {
        Ok(PrivateIpTarget {
            network_interface_id: flags.require(NETWORK_INTERFACE_ID)?.to_string(),
            addresses: flags.require_list(PRIVATE_IP_ADDRESS)?,
        })
    }

    fn probe_keys(&self, target: &PrivateIpTarget) -> Vec<String> {
        target.addresses.clone()
    }

    async fn probe(
        &self,
        client: &Self::Client,
        identity: &ResourceIdentity,
        target: &PrivateIpTarget,
        _operation: &Operation,
    ) -> Result<RemoteStatus, CloudError> {
        let request = RpcRequest::new("DescribeNetworkInterfaceAttribute")
            .param("RegionId", &identity.region_id)
            .param("NetworkInterfaceId", &target.network_interface_id);
        let attribute: NetworkInterfaceAttribute = fetch(client, request).await?;
        Ok(attribute
            .private_addresses()
            .map(|ip| (ip, ASSIGNED))
            .collect())
    }

    async fn mutate(
        &self,
        client: &Self::Client,
        identity: &ResourceIdentity,
        target: &PrivateIpTarget,
        operation: &'static str,
    ) -> Result<(), CloudError> {
        let action = match operation {
            "unassign" => "UnassignPrivateIpAddresses",
            "assign" => "AssignPrivateIpAddresses",
            other => {
                return Err(CloudError::InvalidConfig(format!(
                    "unsupported privateIp operation: {}",
                    other
                )));
            }
        };
        let request = RpcRequest::new(action)
            .param("RegionId", &identity.region_id)
            .param("NetworkInterfaceId", &target.network_interface_id)
            .list("PrivateIpAddress", &target.addresses);
        client.call(request).await?;
        Ok(())
    }
}
