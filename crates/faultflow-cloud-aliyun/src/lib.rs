//! Aliyun fault actions
//!
//! Talks to the ECS RPC API directly: requests are signed with the access key
//! pair of the invocation (signature version 1.0) and sent as HTTPS GETs to
//! the regional endpoint.
//!
//! # Resource kinds
//!
//! - **ecs**: start, stop, reboot
//! - **disk**: detach, attach
//! - **networkInterface**: attach, detach
//! - **privateIp**: unassign, assign
//! - **publicIp**: release, associate, unassociateEip, associateEip
//! - **securityGroup**: remove, join
//! - **vSwitch**: delete, create

pub mod actions;
pub mod channel;
pub mod client;
pub mod error;
pub mod model;
pub mod signer;

#[cfg(test)]
pub(crate) mod testing;

pub use actions::{executors, specs};
pub use channel::AliyunChannel;
pub use client::{EcsApi, EcsClient, EcsClientConfig, RpcRequest};
pub use error::{AliyunError, Result};
