//! Aliyun resource kinds

pub mod disk;
pub mod ecs;
pub mod network_interface;
pub mod private_ip;
pub mod public_ip;
pub mod security_group;
pub mod vswitch;

use crate::client::EcsApi;
use faultflow_cloud::{ActionExecutor, ActionSpec, Channel, Executor};
use std::sync::Arc;

pub use disk::Disk;
pub use ecs::Ecs;
pub use network_interface::NetworkInterface;
pub use private_ip::PrivateIp;
pub use public_ip::PublicIp;
pub use security_group::SecurityGroup;
pub use vswitch::VSwitch;

/// Static descriptions of every Aliyun action, in registry order
pub fn specs() -> Vec<&'static ActionSpec> {
    vec![
        &ecs::SPEC,
        &disk::SPEC,
        &network_interface::SPEC,
        &private_ip::SPEC,
        &public_ip::SPEC,
        &security_group::SPEC,
        &vswitch::SPEC,
    ]
}

/// Every Aliyun action, sharing one channel
pub fn executors(channel: Arc<dyn Channel<Client = dyn EcsApi>>) -> Vec<Box<dyn Executor>> {
    vec![
        Box::new(ActionExecutor::new(Ecs).with_channel(channel.clone())),
        Box::new(ActionExecutor::new(Disk).with_channel(channel.clone())),
        Box::new(ActionExecutor::new(NetworkInterface).with_channel(channel.clone())),
        Box::new(ActionExecutor::new(PrivateIp).with_channel(channel.clone())),
        Box::new(ActionExecutor::new(PublicIp).with_channel(channel.clone())),
        Box::new(ActionExecutor::new(SecurityGroup).with_channel(channel.clone())),
        Box::new(ActionExecutor::new(VSwitch).with_channel(channel)),
    ]
}
