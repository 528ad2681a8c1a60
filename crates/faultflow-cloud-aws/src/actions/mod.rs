//! AWS resource kinds

pub mod ec2;

use crate::client::Ec2Api;
use faultflow_cloud::{ActionExecutor, ActionSpec, Channel, Executor};
use std::sync::Arc;

pub use ec2::Ec2;

pub fn specs() -> Vec<&'static ActionSpec> {
    vec![&ec2::SPEC]
}

pub fn executors(channel: Arc<dyn Channel<Client = dyn Ec2Api>>) -> Vec<Box<dyn Executor>> {
    vec![Box::new(ActionExecutor::new(Ec2).with_channel(channel))]
}
