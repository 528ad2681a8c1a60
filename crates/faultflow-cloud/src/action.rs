//! Resource actions and the executor that drives them
//!
//! A [`ResourceAction`] describes one resource kind: its flags, its operation
//! table, how to probe current status and how to issue the mutating call.
//! [`ActionExecutor`] runs the fixed validate, connect, probe, decide, mutate
//! sequence around it.

use crate::error::{ActionError, CloudError};
use crate::flags::{ACCESS_KEY_ID, ACCESS_KEY_SECRET, ActionFlags, REGION_ID, ResourceIdentity, TYPE};
use crate::guard::{self, Operation, OperationTable, RemoteStatus, Transition};
use crate::response::Response;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

/// A flag accepted by an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagSpec {
    pub name: &'static str,
    pub usage: &'static str,
}

impl FlagSpec {
    pub const fn new(name: &'static str, usage: &'static str) -> Self {
        Self { name, usage }
    }
}

/// Flags shared by every action
pub const COMMON_FLAGS: &[FlagSpec] = &[
    FlagSpec::new(
        ACCESS_KEY_ID,
        "the access key id (falls back to $ACCESS_KEY_ID)",
    ),
    FlagSpec::new(
        ACCESS_KEY_SECRET,
        "the access key secret (falls back to $ACCESS_KEY_SECRET)",
    ),
    FlagSpec::new(REGION_ID, "the region id"),
];

/// Static description of a resource kind
#[derive(Debug, Clone, Copy)]
pub struct ActionSpec {
    /// Provider scope, e.g. `aliyun`
    pub provider: &'static str,
    /// Resource kind, e.g. `ecs`
    pub kind: &'static str,
    pub short: &'static str,
    pub long: &'static str,
    pub example: &'static str,
    /// Kind-specific flags; the `type` flag is described by `operations`
    pub flags: &'static [FlagSpec],
    pub operations: OperationTable,
}

impl ActionSpec {
    /// Every flag of the action, common ones first, `type` last
    pub fn all_flags(&self) -> Vec<FlagSpec> {
        COMMON_FLAGS
            .iter()
            .chain(self.flags.iter())
            .copied()
            .chain(std::iter::once(FlagSpec::new(TYPE, "the operation type")))
            .collect()
    }

    pub fn type_usage(&self) -> String {
        format!(
            "the operation type, support {}",
            self.operations.names().join(", ")
        )
    }
}

/// One resource kind
///
/// `resolve` is pure; `probe` is the single read-only call and `mutate` the
/// single write call of an invocation.
#[async_trait]
pub trait ResourceAction: Send + Sync + 'static {
    /// Provider client the action talks to
    type Client: ?Sized + Send + Sync;
    /// Resolved identifiers the action works on
    type Target: Send + Sync;

    fn spec(&self) -> &'static ActionSpec;

    /// Validate kind-specific flags for the requested operation
    fn resolve(&self, flags: &ActionFlags, operation: &Operation)
    -> Result<Self::Target, ActionError>;

    /// Identifiers scanned by the flip rule
    fn probe_keys(&self, target: &Self::Target) -> Vec<String>;

    async fn probe(
        &self,
        client: &Self::Client,
        identity: &ResourceIdentity,
        target: &Self::Target,
        operation: &Operation,
    ) -> Result<RemoteStatus, CloudError>;

    async fn mutate(
        &self,
        client: &Self::Client,
        identity: &ResourceIdentity,
        target: &Self::Target,
        operation: &'static str,
    ) -> Result<(), CloudError>;
}

/// Transport that builds a provider client for one invocation
#[async_trait]
pub trait Channel: Send + Sync {
    type Client: ?Sized + Send + Sync;

    /// Provider name used in error messages
    fn provider(&self) -> &'static str;

    async fn connect(&self, identity: &ResourceIdentity) -> Result<Arc<Self::Client>, CloudError>;
}

/// What an invocation actually did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub kind: &'static str,
    pub requested: &'static str,
    pub executed: &'static str,
    pub flipped: bool,
}

/// Runs a [`ResourceAction`] over an injected [`Channel`]
pub struct ActionExecutor<A: ResourceAction> {
    action: A,
    channel: Option<Arc<dyn Channel<Client = A::Client>>>,
}

impl<A: ResourceAction> ActionExecutor<A> {
    pub fn new(action: A) -> Self {
        Self {
            action,
            channel: None,
        }
    }

    pub fn with_channel(mut self, channel: Arc<dyn Channel<Client = A::Client>>) -> Self {
        self.channel = Some(channel);
        self
    }

    pub fn set_channel(&mut self, channel: Arc<dyn Channel<Client = A::Client>>) {
        self.channel = Some(channel);
    }

    pub fn action(&self) -> &A {
        &self.action
    }

    pub async fn execute(&self, flags: &ActionFlags) -> Result<Outcome, ActionError> {
        let spec = self.action.spec();
        let channel = self.channel.as_ref().ok_or(ActionError::ChannelNil)?;

        let identity = ResourceIdentity::resolve(flags)?;
        let requested = flags.require(TYPE)?;
        let operation = spec.operations.lookup(requested)?;
        let target = self.action.resolve(flags, operation)?;

        let client = channel
            .connect(&identity)
            .await
            .map_err(|source| ActionError::ClientUnavailable {
                provider: channel.provider().to_string(),
                source,
            })?;

        let observed = self
            .action
            .probe(&client, &identity, &target, operation)
            .await
            .map_err(|source| ActionError::RequestFailed {
                context: format!("describe {} status failed", spec.kind),
                source,
            })?;

        let keys = self.action.probe_keys(&target);
        let transition = guard::decide(operation, &observed, &keys);
        match transition {
            Transition::Inverse(executed) => tracing::info!(
                kind = spec.kind,
                requested = operation.name,
                executed,
                "resource already reflects the request, executing the inverse"
            ),
            Transition::Forward(executed) => {
                tracing::info!(kind = spec.kind, executed, "executing as requested")
            }
        }

        let executed = transition.operation();
        self.action
            .mutate(&client, &identity, &target, executed)
            .await
            .map_err(|source| ActionError::MutationFailed {
                action: format!("{} {}", spec.kind, executed),
                source,
            })?;

        Ok(Outcome {
            kind: spec.kind,
            requested: operation.name,
            executed,
            flipped: transition.is_flipped(),
        })
    }

    pub async fn exec(&self, flags: &ActionFlags) -> Response {
        let result = self.execute(flags).await;
        if let Err(e) = &result {
            tracing::error!(kind = self.action.spec().kind, error = %e, "action failed");
        }
        result.into()
    }
}

/// Type-erased executor held by the command registry
#[async_trait]
pub trait Executor: Send + Sync {
    fn name(&self) -> &'static str;
    fn spec(&self) -> &'static ActionSpec;
    async fn exec(&self, flags: &ActionFlags) -> Response;
}

#[async_trait]
impl<A: ResourceAction> Executor for ActionExecutor<A> {
    fn name(&self) -> &'static str {
        self.action.spec().kind
    }

    fn spec(&self) -> &'static ActionSpec {
        self.action.spec()
    }

    async fn exec(&self, flags: &ActionFlags) -> Response {
        ActionExecutor::exec(self, flags).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::FlipWhen;
    use crate::response::ResultCode;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const LAMP_SPEC: ActionSpec = ActionSpec {
        provider: "test",
        kind: "lamp",
        short: "toggle lamps",
        long: "toggle lamps",
        example: "fault test lamp --lamps l-1 --type on",
        flags: &[FlagSpec::new("lamps", "the lamp ids")],
        operations: OperationTable::new(&[
            Operation::flipping("on", "off", FlipWhen::StatusIs("Lit")),
            Operation::flipping("off", "on", FlipWhen::StatusIsNot("Lit")),
            Operation::plain("blink"),
        ]),
    };

    #[derive(Default)]
    struct Switchboard {
        lit: Mutex<Vec<String>>,
        probes: AtomicUsize,
        mutations: Mutex<Vec<String>>,
        fail_probe: bool,
        fail_mutate: bool,
    }

    struct Lamp;

    #[async_trait]
    impl ResourceAction for Lamp {
        type Client = Switchboard;
        type Target = Vec<String>;

        fn spec(&self) -> &'static ActionSpec {
            &LAMP_SPEC
        }

        fn resolve(
            &self,
            flags: &ActionFlags,
            _operation: &Operation,
        ) -> Result<Vec<String>, ActionError> {
            flags.require_list("lamps")
        }

        fn probe_keys(&self, target: &Vec<String>) -> Vec<String> {
            target.clone()
        }

        async fn probe(
            &self,
            client: &Switchboard,
            _identity: &ResourceIdentity,
            target: &Vec<String>,
            _operation: &Operation,
        ) -> Result<RemoteStatus, CloudError> {
            client.probes.fetch_add(1, Ordering::SeqCst);
            if client.fail_probe {
                return Err(CloudError::Http("connection reset".into()));
            }
            let lit = client.lit.lock().unwrap();
            Ok(target
                .iter()
                .filter(|id| lit.contains(*id))
                .map(|id| (id.clone(), "Lit"))
                .collect())
        }

        async fn mutate(
            &self,
            client: &Switchboard,
            _identity: &ResourceIdentity,
            target: &Vec<String>,
            operation: &'static str,
        ) -> Result<(), CloudError> {
            client.mutations.lock().unwrap().push(operation.to_string());
            if client.fail_mutate {
                return Err(CloudError::Api {
                    code: "Forbidden".into(),
                    message: "no".into(),
                });
            }
            let mut lit = client.lit.lock().unwrap();
            match operation {
                "on" => lit.extend(target.iter().cloned()),
                "off" => lit.retain(|id| !target.contains(id)),
                _ => {}
            }
            Ok(())
        }
    }

    struct TestChannel {
        board: Arc<Switchboard>,
        connects: AtomicUsize,
        refuse: bool,
    }

    impl TestChannel {
        fn new(board: Switchboard) -> Arc<Self> {
            Arc::new(Self {
                board: Arc::new(board),
                connects: AtomicUsize::new(0),
                refuse: false,
            })
        }
    }

    #[async_trait]
    impl Channel for TestChannel {
        type Client = Switchboard;

        fn provider(&self) -> &'static str {
            "test"
        }

        async fn connect(&self, _identity: &ResourceIdentity) -> Result<Arc<Switchboard>, CloudError> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            if self.refuse {
                return Err(CloudError::InvalidConfig("bad endpoint".into()));
            }
            Ok(self.board.clone())
        }
    }

    fn lamp_flags(lamps: &str, op: &str) -> ActionFlags {
        ActionFlags::new()
            .with(ACCESS_KEY_ID, "id")
            .with(ACCESS_KEY_SECRET, "secret")
            .with(REGION_ID, "test-1")
            .with("lamps", lamps)
            .with(TYPE, op)
    }

    fn lamp_executor(channel: &Arc<TestChannel>) -> ActionExecutor<Lamp> {
        ActionExecutor::new(Lamp).with_channel(channel.clone())
    }

    #[tokio::test]
    async fn test_channel_nil_is_checked_first() {
        let executor = ActionExecutor::new(Lamp);
        let err = executor.execute(&ActionFlags::new()).await.unwrap_err();
        assert!(matches!(err, ActionError::ChannelNil));
        assert_eq!(executor.exec(&ActionFlags::new()).await.code, 50000);
    }

    #[tokio::test]
    async fn test_missing_target_makes_no_calls() {
        let channel = TestChannel::new(Switchboard::default());
        let err = lamp_executor(&channel)
            .execute(&lamp_flags(" ", "on"))
            .await
            .unwrap_err();

        assert!(matches!(err, ActionError::MissingParameter(f) if f == "lamps"));
        assert_eq!(channel.connects.load(Ordering::SeqCst), 0);
        assert_eq!(channel.board.probes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_type() {
        let channel = TestChannel::new(Switchboard::default());
        let err = lamp_executor(&channel)
            .execute(&lamp_flags("l-1", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::MissingParameter(f) if f == "type"));
    }

    #[tokio::test]
    async fn test_unknown_type_lists_supported_set() {
        let channel = TestChannel::new(Switchboard::default());
        let response = lamp_executor(&channel).exec(&lamp_flags("l-1", "explode")).await;

        assert_eq!(response.code, ResultCode::InvalidParameter.as_u32());
        assert!(response.err.unwrap().contains("support on, off, blink"));
        assert_eq!(channel.connects.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_connect_failure_is_client_unavailable() {
        let channel = Arc::new(TestChannel {
            board: Arc::new(Switchboard::default()),
            connects: AtomicUsize::new(0),
            refuse: true,
        });
        let err = lamp_executor(&channel)
            .execute(&lamp_flags("l-1", "on"))
            .await
            .unwrap_err();

        assert_eq!(err.code(), ResultCode::ClientUnavailable);
        assert_eq!(
            err.to_string(),
            "create test client failed: Invalid configuration: bad endpoint"
        );
        assert_eq!(channel.board.probes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_probe_failure_issues_no_mutation() {
        let channel = TestChannel::new(Switchboard {
            fail_probe: true,
            ..Default::default()
        });
        let response = lamp_executor(&channel).exec(&lamp_flags("l-1", "on")).await;

        assert_eq!(response.code, ResultCode::RequestFailed.as_u32());
        assert!(channel.board.mutations.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mutation_failure_embeds_provider_message() {
        let channel = TestChannel::new(Switchboard {
            fail_mutate: true,
            ..Default::default()
        });
        let response = lamp_executor(&channel).exec(&lamp_flags("l-1", "on")).await;

        assert_eq!(response.code, ResultCode::MutationFailed.as_u32());
        assert_eq!(
            response.err.as_deref(),
            Some("lamp on failed: API error [Forbidden]: no")
        );
    }

    #[tokio::test]
    async fn test_forward_then_flip_toggles() {
        let channel = TestChannel::new(Switchboard::default());
        let executor = lamp_executor(&channel);

        let first = executor.execute(&lamp_flags("l-1", "on")).await.unwrap();
        assert_eq!(first.executed, "on");
        assert!(!first.flipped);

        let second = executor.execute(&lamp_flags("l-1", "on")).await.unwrap();
        assert_eq!(second.requested, "on");
        assert_eq!(second.executed, "off");
        assert!(second.flipped);

        assert_eq!(*channel.board.mutations.lock().unwrap(), vec!["on", "off"]);
        assert_eq!(channel.board.probes.load(Ordering::SeqCst), 2);
        assert_eq!(channel.connects.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_plain_operation_still_probes_once() {
        let channel = TestChannel::new(Switchboard::default());
        let response = lamp_executor(&channel).exec(&lamp_flags("l-1,l-2", "blink")).await;

        assert!(response.is_success());
        assert_eq!(channel.board.probes.load(Ordering::SeqCst), 1);
        assert_eq!(*channel.board.mutations.lock().unwrap(), vec!["blink"]);
    }

    #[tokio::test]
    async fn test_executor_trait_object() {
        let channel = TestChannel::new(Switchboard::default());
        let boxed: Box<dyn Executor> = Box::new(lamp_executor(&channel));

        assert_eq!(boxed.name(), "lamp");
        assert_eq!(boxed.spec().all_flags().len(), 5);
        assert!(boxed.exec(&lamp_flags("l-1", "off")).await.is_success());
        // off on an unlit lamp flips to on
        assert_eq!(*channel.board.mutations.lock().unwrap(), vec!["on"]);
    }
}
