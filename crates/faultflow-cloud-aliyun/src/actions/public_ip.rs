//! Public IP release/allocate and EIP unassociate/associate

use crate::client::{EcsApi, RpcRequest, fetch};
use crate::model::{DescribeEipAddressesResponse, DescribeInstancesResponse};
use async_trait::async_trait;
use faultflow_cloud::{
    ActionError, ActionFlags, ActionSpec, CloudError, FlagSpec, FlipWhen, Operation,
    OperationTable, RemoteStatus, ResourceAction, ResourceIdentity,
};

pub const INSTANCE_ID: &str = "instanceId";
pub const PUBLIC_IP_ADDRESS: &str = "publicIpAddress";
pub const ALLOCATION_ID: &str = "allocationId";

/// Status reported for a public address bound to the instance
pub const ASSOCIATED: &str = "Associated";
pub const IN_USE: &str = "InUse";

pub static SPEC: ActionSpec = ActionSpec {
    provider: "aliyun",
    kind: "publicIp",
    short: "do some aliyun public ip operations, like release, unassociateEip",
    long: "Release the public ip of an ecs instance or allocate it again, and \
           unassociate an elastic ip from an instance or associate it back.",
    example: "# release public ip 1.1.1.1 of instance i-x
fault aliyun publicIp --accessKeyId xxx --accessKeySecret yyy --regionId cn-qingdao --type release --publicIpAddress 1.1.1.1 --instanceId i-x

# unassociate elastic ip a-x from instance i-x
fault aliyun publicIp --accessKeyId xxx --accessKeySecret yyy --regionId cn-qingdao --type unassociateEip --allocationId a-x --instanceId i-x",
    flags: &[
        FlagSpec::new(INSTANCE_ID, "the instance id"),
        FlagSpec::new(PUBLIC_IP_ADDRESS, "the public ip address"),
        FlagSpec::new(ALLOCATION_ID, "the allocation id of the elastic ip"),
    ],
    operations: OperationTable::new(&[
        Operation::flipping("release", "associate", FlipWhen::StatusIsNot(ASSOCIATED)),
        Operation::flipping("associate", "release", FlipWhen::StatusIs(ASSOCIATED)),
        Operation::flipping(
            "unassociateEip",
            "associateEip",
            FlipWhen::StatusIsNot(IN_USE),
        ),
        Operation::flipping("associateEip", "unassociateEip", FlipWhen::StatusIs(IN_USE)),
    ]),
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicIpTarget {
    /// Public address allocated with the instance
    Address {
        public_ip_address: String,
        instance_id: String,
    },
    /// Elastic IP
    Eip {
        allocation_id: String,
        instance_id: String,
        eip_address: Option<String>,
    },
}

pub struct PublicIp;

fn is_eip(operation: &str) -> bool {
    matches!(operation, "unassociateEip" | "associateEip")
}

#[async_trait]
impl ResourceAction for PublicIp {
    type Client = dyn EcsApi;
    type Target = PublicIpTarget;

    fn spec(&self) -> &'static ActionSpec {
        &SPEC
    }

    fn resolve(
        &self,
        flags: &ActionFlags,
        operation: &Operation,
    ) -> Result<PublicIpTarget, ActionError> {
        if is_eip(operation.name) {
            Ok(PublicIpTarget::Eip {
                allocation_id: flags.require(ALLOCATION_ID)?.to_string(),
                instance_id: flags.require(INSTANCE_ID)?.to_string(),
                eip_address: flags.get(PUBLIC_IP_ADDRESS).map(str::to_string),
            })
        } else {
            Ok(PublicIpTarget::Address {
                public_ip_address: flags.require(PUBLIC_IP_ADDRESS)?.to_string(),
                instance_id: flags.require(INSTANCE_ID)?.to_string(),
            })
        }
    }

    fn probe_keys(&self, target: &PublicIpTarget) -> Vec<String> {
        match target {
            PublicIpTarget::Address {
                public_ip_address, ..
            } => vec![public_ip_address.clone()],
            PublicIpTarget::Eip { allocation_id, .. } => vec![allocation_id.clone()],
        }
    }

    async fn probe(
        &self,
        client: &Self::Client,
        identity: &ResourceIdentity,
        target: &PublicIpTarget,
        _operation: &Operation,
    ) -> Result<RemoteStatus, CloudError> {
        match target {
            PublicIpTarget::Address { instance_id, .. } => {
                let request = RpcRequest::new("DescribeInstances")
                    .param("RegionId", &identity.region_id)
                    .param("InstanceIds", format!(r#"["{}"]"#, instance_id));
                let response: DescribeInstancesResponse = fetch(client, request).await?;
                Ok(response
                    .instances
                    .instance
                    .into_iter()
                    .flat_map(|i| i.public_ip_address.ip_address)
                    .map(|ip| (ip, ASSOCIATED))
                    .collect())
            }
            PublicIpTarget::Eip {
                allocation_id,
                eip_address,
                ..
            } => {
                let mut request = RpcRequest::new("DescribeEipAddresses")
                    .param("RegionId", &identity.region_id)
                    .param("AllocationId", allocation_id);
                if let Some(address) = eip_address {
                    request = request.param("EipAddress", address);
                }
                let response: DescribeEipAddressesResponse = fetch(client, request).await?;
                Ok(response
                    .eip_addresses
                    .eip_address
                    .into_iter()
                    .map(|e| (e.allocation_id, e.status))
                    .collect())
            }
        }
    }

    async fn mutate(
        &self,
        client: &Self::Client,
        identity: &ResourceIdentity,
        target: &PublicIpTarget,
        operation: &'static str,
    ) -> Result<(), CloudError> {
        let request = match (operation, target) {
            (
                "release",
                PublicIpTarget::Address {
                    public_ip_address,
                    instance_id,
                },
            ) => RpcRequest::new("ReleasePublicIpAddress")
                .param("PublicIpAddress", public_ip_address)
                .param("InstanceId", instance_id),
            (
                "associate",
                PublicIpTarget::Address {
                    public_ip_address,
                    instance_id,
                },
            ) => RpcRequest::new("AllocatePublicIpAddress")
                .param("IpAddress", public_ip_address)
                .param("InstanceId", instance_id),
            (
                "unassociateEip" | "associateEip",
                PublicIpTarget::Eip {
                    allocation_id,
                    instance_id,
                    ..
                },
            ) => RpcRequest::new(if operation == "associateEip" {
                "AssociateEipAddress"
            } else {
                "UnassociateEipAddress"
            })
            .param("AllocationId", allocation_id)
            .param("InstanceId", instance_id)
            .param("RegionId", &identity.region_id),
            (other, _) => {
                return Err(CloudError::InvalidConfig(format!(
                    "unsupported publicIp operation: {}",
                    other
                )));
            }
        };
        client.call(request).await?;
        Ok(())
    }
}
