//! VPC switch delete/create

use crate::client::{EcsApi, RpcRequest, fetch};
use crate::model::DescribeVSwitchesResponse;
use async_trait::async_trait;
use faultflow_cloud::{
    ActionError, ActionFlags, ActionSpec, CloudError, FlagSpec, FlipWhen, Operation,
    OperationTable, RemoteStatus, ResourceAction, ResourceIdentity,
};

pub const VSWITCH_ID: &str = "vSwitchId";
pub const ZONE_ID: &str = "zoneId";
pub const CIDR_BLOCK: &str = "cidrBlock";
pub const VPC_ID: &str = "vpcId";

pub const AVAILABLE: &str = "Available";

pub static SPEC: ActionSpec = ActionSpec {
    provider: "aliyun",
    kind: "vSwitch",
    short: "do some aliyun vSwitch operations, like delete, create",
    long: "Delete a vSwitch or create it again. Deleting needs the zone, cidr block \
           and vpc as well so that the switch can be recreated.",
    example: "# delete vSwitch vsw-x
fault aliyun vSwitch --accessKeyId xxx --accessKeySecret yyy --regionId cn-qingdao --type delete --vSwitchId vsw-x --zoneId cn-qingdao-b --cidrBlock 172.16.0.0/24 --vpcId vpc-x

# create a vSwitch in vpc vpc-x
fault aliyun vSwitch --accessKeyId xxx --accessKeySecret yyy --regionId cn-qingdao --type create --zoneId cn-qingdao-b --cidrBlock 172.16.0.0/24 --vpcId vpc-x",
    flags: &[
        FlagSpec::new(VSWITCH_ID, "the vSwitch id"),
        FlagSpec::new(ZONE_ID, "the zone id"),
        FlagSpec::new(CIDR_BLOCK, "the cidr block of the vSwitch"),
        FlagSpec::new(VPC_ID, "the vpc id"),
    ],
    operations: OperationTable::new(&[
        Operation::flipping("delete", "create", FlipWhen::StatusIsNot(AVAILABLE)),
        Operation::flipping("create", "delete", FlipWhen::StatusIs(AVAILABLE)),
    ]),
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VSwitchTarget {
    /// Optional for `create`, where it only detects an existing switch
    pub vswitch_id: Option<String>,
    pub zone_id: String,
    pub cidr_block: String,
    pub vpc_id: String,
}

pub struct VSwitch;

#[async_trait]
impl ResourceAction for VSwitch {
    type Client = dyn EcsApi;
    type Target = VSwitchTarget;

    fn spec(&self) -> &'static ActionSpec {
        &SPEC
    }

    fn resolve(
        &self,
        flags: &ActionFlags,
        operation: &Operation,
    ) -> Result<VSwitchTarget, ActionError> {
        let vswitch_id = if operation.name == "delete" {
            Some(flags.require(VSWITCH_ID)?.to_string())
        } else {
            flags.get(VSWITCH_ID).map(str::to_string)
        };
        Ok(VSwitchTarget {
            vswitch_id,
            zone_id: flags.require(ZONE_ID)?.to_string(),
            cidr_block: flags.require(CIDR_BLOCK)?.to_string(),
            vpc_id: flags.require(VPC_ID)?.to_string(),
        })
    }

    fn probe_keys(&self, target: &VSwitchTarget) -> Vec<String> {
        target.vswitch_id.iter().cloned().collect()
    }

    async fn probe(
        &self,
        client: &Self::Client,
        identity: &ResourceIdentity,
        _target: &VSwitchTarget,
        _operation: &Operation,
    ) -> Result<RemoteStatus, CloudError> {
        let request = RpcRequest::new("DescribeVSwitches").param("RegionId", &identity.region_id);
        let response: DescribeVSwitchesResponse = fetch(client, request).await?;
        Ok(response
            .vswitches
            .vswitch
            .into_iter()
            .map(|v| (v.vswitch_id, v.status))
            .collect())
    }

    async fn mutate(
        &self,
        client: &Self::Client,
        identity: &ResourceIdentity,
        target: &VSwitchTarget,
        operation: &'static str,
    ) -> Result<(), CloudError> {
        let request = match (operation, &target.vswitch_id) {
            ("delete", Some(vswitch_id)) => {
                RpcRequest::new("DeleteVSwitch").param("VSwitchId", vswitch_id)
            }
            ("delete", None) => return Err(CloudError::InvalidConfig("vSwitchId is not set".into())),
            ("create", _) => RpcRequest::new("CreateVSwitch")
                .param("RegionId", &identity.region_id)
                .param("ZoneId", &target.zone_id)
                .param("CidrBlock", &target.cidr_block)
                .param("VpcId", &target.vpc_id),
            (other, _) => {
                return Err(CloudError::InvalidConfig(format!(
                    "unsupported vSwitch operation: {}",
                    other
                )));
            }
        };
        client.call(request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeEcs, channel, flags};
    use faultflow_cloud::{ActionExecutor, ResultCode};
    use serde_json::json;

    fn switches(pairs: &[(&str, &str)]) -> serde_json::Value {
        let list: Vec<_> = pairs
            .iter()
            .map(|(id, status)| json!({"VSwitchId": id, "Status": status}))
            .collect();
        json!({"VSwitches": {"VSwitch": list}})
    }

    const NETWORK: [(&str, &str); 3] = [
        (ZONE_ID, "cn-qingdao-b"),
        (CIDR_BLOCK, "172.16.0.0/24"),
        (VPC_ID, "vpc-1"),
    ];

    #[tokio::test]
    async fn test_delete_available_switch() {
        let ecs = FakeEcs::new().respond("DescribeVSwitches", switches(&[("vsw-1", "Available")]));
        let executor = ActionExecutor::new(VSwitch).with_channel(channel(&ecs));

        let mut extra = NETWORK.to_vec();
        extra.push((VSWITCH_ID, "vsw-1"));
        let outcome = executor.execute(&flags("delete", &extra)).await.unwrap();

        assert_eq!(outcome.executed, "delete");
        assert_eq!(ecs.call("DeleteVSwitch").get("VSwitchId"), Some("vsw-1"));
    }

    #[tokio::test]
    async fn test_delete_missing_switch_recreates_it() {
        let ecs = FakeEcs::new().respond("DescribeVSwitches", switches(&[("vsw-2", "Available")]));
        let executor = ActionExecutor::new(VSwitch).with_channel(channel(&ecs));

        let mut extra = NETWORK.to_vec();
        extra.push((VSWITCH_ID, "vsw-1"));
        let outcome = executor.execute(&flags("delete", &extra)).await.unwrap();

        assert_eq!(outcome.executed, "create");
        let create = ecs.call("CreateVSwitch");
        assert_eq!(create.get("ZoneId"), Some("cn-qingdao-b"));
        assert_eq!(create.get("CidrBlock"), Some("172.16.0.0/24"));
        assert_eq!(create.get("VpcId"), Some("vpc-1"));
        assert_eq!(create.get("RegionId"), Some("cn-hangzhou"));
    }

    #[tokio::test]
    async fn test_create_without_switch_id() {
        let ecs = FakeEcs::new().respond("DescribeVSwitches", switches(&[("vsw-1", "Available")]));
        let executor = ActionExecutor::new(VSwitch).with_channel(channel(&ecs));

        let outcome = executor.execute(&flags("create", &NETWORK)).await.unwrap();

        assert!(!outcome.flipped);
        assert_eq!(ecs.actions(), vec!["DescribeVSwitches", "CreateVSwitch"]);
    }

    #[tokio::test]
    async fn test_create_existing_switch_deletes_it() {
        let ecs = FakeEcs::new().respond("DescribeVSwitches", switches(&[("vsw-1", "Available")]));
        let executor = ActionExecutor::new(VSwitch).with_channel(channel(&ecs));

        let mut extra = NETWORK.to_vec();
        extra.push((VSWITCH_ID, "vsw-1"));
        let outcome = executor.execute(&flags("create", &extra)).await.unwrap();

        assert_eq!(outcome.executed, "delete");
        assert_eq!(ecs.call("DeleteVSwitch").get("VSwitchId"), Some("vsw-1"));
    }

    #[tokio::test]
    async fn test_required_fields_per_type() {
        let ecs = FakeEcs::new();
        let executor = ActionExecutor::new(VSwitch).with_channel(channel(&ecs));

        let response = executor.exec(&flags("delete", &NETWORK)).await;
        assert_eq!(response.code, ResultCode::MissingParameter.as_u32());
        assert_eq!(response.err.as_deref(), Some("less parameter: `vSwitchId`"));

        let response = executor
            .exec(&flags("create", &[(ZONE_ID, "cn-qingdao-b"), (VPC_ID, "vpc-1")]))
            .await;
        assert_eq!(response.err.as_deref(), Some("less parameter: `cidrBlock`"));

        assert!(ecs.calls().is_empty());
    }
}
