//! FaultFlow fault injection engine
//!
//! Provider-neutral core shared by every fault action. An action validates its
//! flags, probes the current status of the target resources, decides whether
//! the request is already reflected remotely and issues either the requested
//! call or its inverse.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                   fault CLI                      │
//! │            (fault aliyun ecs --type stop)        │
//! └─────────────────┬───────────────────────────────┘
//!                   │  dyn Executor
//! ┌─────────────────▼───────────────────────────────┐
//! │               faultflow-cloud                    │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │  ActionExecutor<A: ResourceAction>        │   │
//! │  │  resolve → connect → probe → decide →     │   │
//! │  │  mutate                                   │   │
//! │  └──────────────────────────────────────────┘   │
//! └───────┬─────────────────┬───────────────────────┘
//!         │ Channel         │ Channel
//! ┌───────▼───────┐ ┌───────▼───────┐
//! │    aliyun     │ │      aws      │
//! │  ECS RPC API  │ │   EC2 (SDK)   │
//! └───────────────┘ └───────────────┘
//! ```

pub mod action;
pub mod error;
pub mod flags;
pub mod guard;
pub mod response;

// Re-exports
pub use action::{
    ActionExecutor, ActionSpec, COMMON_FLAGS, Channel, Executor, FlagSpec, Outcome,
    ResourceAction,
};
pub use error::{ActionError, CloudError, Result};
pub use flags::{ActionFlags, Credentials, ResourceIdentity, split_list};
pub use guard::{FlipWhen, Operation, OperationTable, RemoteStatus, Transition, decide};
pub use response::{Response, ResultCode};
