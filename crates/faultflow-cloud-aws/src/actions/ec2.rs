//! EC2 instance start/stop/reboot

use crate::client::Ec2Api;
use async_trait::async_trait;
use faultflow_cloud::{
    ActionError, ActionFlags, ActionSpec, CloudError, FlagSpec, FlipWhen, Operation,
    OperationTable, RemoteStatus, ResourceAction, ResourceIdentity,
};

pub const INSTANCES: &str = "instances";

pub const RUNNING: &str = "Running";
pub const STOPPED: &str = "Stopped";

pub static SPEC: ActionSpec = ActionSpec {
    provider: "aws",
    kind: "ec2",
    short: "do some aws ec2 operations, like stop, start, reboot",
    long: "Stop, start or reboot aws ec2 instances. Starting running instances \
           stops them and stopping stopped instances starts them.",
    example: "# stop instances which instance id is i-x,i-y
fault aws ec2 --accessKeyId xxx --accessKeySecret yyy --regionId us-west-2 --type stop --instances i-x,i-y

# start instances which instance id is i-x,i-y
fault aws ec2 --accessKeyId xxx --accessKeySecret yyy --regionId us-west-2 --type start --instances i-x,i-y

# reboot instances which instance id is i-x,i-y
fault aws ec2 --accessKeyId xxx --accessKeySecret yyy --regionId us-west-2 --type reboot --instances i-x,i-y",
    flags: &[FlagSpec::new(INSTANCES, "the instances list, split by comma")],
    operations: OperationTable::new(&[
        Operation::flipping("start", "stop", FlipWhen::StatusIs(RUNNING)),
        Operation::flipping("stop", "start", FlipWhen::StatusIs(STOPPED)),
        Operation::plain("reboot"),
    ]),
};

/// `running` becomes `Running`
pub fn capitalize(state: &str) -> String {
    let mut chars = state.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub struct Ec2;

#[async_trait]
impl ResourceAction for Ec2 {
    type Client = dyn Ec2Api;
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
        _identity: &ResourceIdentity,
        target: &Vec<String>,
        _operation: &Operation,
    ) -> Result<RemoteStatus, CloudError> {
        let observed = client.describe_instance_status(target).await?;
        Ok(observed
            .into_iter()
            .map(|i| {
                let state = capitalize(&i.state);
                (i.instance_id, state)
            })
            .collect())
    }

    async fn mutate(
        &self,
        client: &Self::Client,
        _identity: &ResourceIdentity,
        target: &Vec<String>,
        operation: &'static str,
    ) -> Result<(), CloudError> {
        match operation {
            "start" => client.start_instances(target).await?,
            "stop" => client.stop_instances(target).await?,
            "reboot" => client.reboot_instances(target).await?,
            other => {
                return Err(CloudError::InvalidConfig(format!(
                    "unsupported ec2 operation: {}",
                    other
                )));
            }
        }
        tracing::info!(operation, instances = ?target, "ec2 instances updated");
        Ok(())
    }
}
