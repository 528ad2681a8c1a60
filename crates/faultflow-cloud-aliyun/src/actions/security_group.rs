//! Security group membership of an instance or a network interface

use crate::client::{EcsApi, RpcRequest, fetch};
use crate::model::{DescribeInstancesResponse, NetworkInterfaceAttribute};
use async_trait::async_trait;
use faultflow_cloud::{
    ActionError, ActionFlags, ActionSpec, CloudError, FlagSpec, FlipWhen, Operation,
    OperationTable, RemoteStatus, ResourceAction, ResourceIdentity,
};

pub const SECURITY_GROUP_ID: &str = "securityGroupId";
pub const INSTANCE_ID: &str = "instanceId";
pub const NETWORK_INTERFACE_ID: &str = "networkInterfaceId";

/// Status reported for a group the member belongs to
pub const JOINED: &str = "Joined";

pub static SPEC: ActionSpec = ActionSpec {
    provider: "aliyun",
    kind: "securityGroup",
    short: "do some aliyun securityGroup operations, like remove, join",
    long: "Remove an ecs instance or a network interface from a security group or \
           join it back. Exactly one of instanceId and networkInterfaceId is accepted.",
    example: "# remove instance i-x from securityGroup s-x
fault aliyun securityGroup --accessKeyId xxx --accessKeySecret yyy --regionId cn-qingdao --type remove --securityGroupId s-x --instanceId i-x

# join networkInterface n-x to securityGroup s-x
fault aliyun securityGroup --accessKeyId xxx --accessKeySecret yyy --regionId cn-qingdao --type join --securityGroupId s-x --networkInterfaceId n-x",
    flags: &[
        FlagSpec::new(SECURITY_GROUP_ID, "the security group id"),
        FlagSpec::new(INSTANCE_ID, "the instance id"),
        FlagSpec::new(NETWORK_INTERFACE_ID, "the network interface id"),
    ],
    operations: OperationTable::new(&[
        Operation::flipping("remove", "join", FlipWhen::StatusIsNot(JOINED)),
        Operation::flipping("join", "remove", FlipWhen::StatusIs(JOINED)),
    ]),
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    Instance(String),
    NetworkInterface(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityGroupTarget {
    pub security_group_id: String,
    pub member: Member,
}

pub struct SecurityGroup;

#[async_trait]
impl ResourceAction for SecurityGroup {
    type Client = dyn EcsApi;
    type Target = SecurityGroupTarget;

    fn spec(&self) -> &'static ActionSpec {
        &SPEC
    }

    fn resolve(
        &self,
        flags: &ActionFlags,
        _operation: &Operation,
    ) -> Result<SecurityGroupTarget, ActionError> {
        let security_group_id = flags.require(SECURITY_GROUP_ID)?.to_string();
        let member = match (flags.get(INSTANCE_ID), flags.get(NETWORK_INTERFACE_ID)) {
            (Some(_), Some(_)) => {
                return Err(ActionError::invalid(format!(
                    "`{}` and `{}` can not be set at the same time",
                    INSTANCE_ID, NETWORK_INTERFACE_ID
                )));
            }
            (Some(instance), None) => Member::Instance(instance.to_string()),
            (None, Some(nic)) => Member::NetworkInterface(nic.to_string()),
            (None, None) => return Err(ActionError::missing(INSTANCE_ID)),
        };
        Ok(SecurityGroupTarget {
            security_group_id,
            member,
        })
    }

    fn probe_keys(&self, target: &SecurityGroupTarget) -> Vec<String> {
        vec![target.security_group_id.clone()]
    }

    async fn probe(
        &self,
        client: &Self::Client,
        identity: &ResourceIdentity,
        target: &SecurityGroupTarget,
        _operation: &Operation,
    ) -> Result<RemoteStatus, CloudError> {
        let groups = match &target.member {
            Member::Instance(instance_id) => {
                let request = RpcRequest::new("DescribeInstances")
                    .param("RegionId", &identity.region_id)
                    .param("InstanceIds", format!(r#"["{}"]"#, instance_id));
                let response: DescribeInstancesResponse = fetch(client, request).await?;
                response
                    .instances
                    .instance
                    .into_iter()
                    .flat_map(|i| i.security_group_ids.security_group_id)
                    .collect::<Vec<_>>()
            }
            Member::NetworkInterface(nic) => {
                let request = RpcRequest::new("DescribeNetworkInterfaceAttribute")
                    .param("RegionId", &identity.region_id)
                    .param("NetworkInterfaceId", nic);
                let attribute: NetworkInterfaceAttribute = fetch(client, request).await?;
                attribute.security_group_ids.security_group_id
            }
        };
        Ok(groups.into_iter().map(|group| (group, JOINED)).collect())
    }

    async fn mutate(
        &self,
        client: &Self::Client,
        identity: &ResourceIdentity,
        target: &SecurityGroupTarget,
        operation: &'static str,
    ) -> Result<(), CloudError> {
        let action = match operation {
            "join" => "JoinSecurityGroup",
            "remove" => "LeaveSecurityGroup",
            other => {
                return Err(CloudError::InvalidConfig(format!(
                    "unsupported securityGroup operation: {}",
                    other
                )));
            }
        };
        let request =
            RpcRequest::new(action).param("SecurityGroupId", &target.security_group_id);
        let request = match &target.member {
            Member::Instance(instance_id) => request.param("InstanceId", instance_id),
            Member::NetworkInterface(nic) => request
                .param("RegionId", &identity.region_id)
                .param("NetworkInterfaceId", nic),
        };
        client.call(request).await?;
        Ok(())
    }
}
