//! AWS fault actions
//!
//! Built on the official SDK. Credentials come from the invocation, never
//! from the default provider chain.
//!
//! # Resource kinds
//!
//! - **ec2**: start, stop, reboot

pub mod actions;
pub mod channel;
pub mod client;
pub mod error;

#[cfg(test)]
pub(crate) mod testing;

pub use actions::{executors, specs};
pub use channel::AwsChannel;
pub use client::{AwsEc2, Ec2Api, Ec2ClientConfig, ObservedInstance};
