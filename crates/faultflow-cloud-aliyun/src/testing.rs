//! Recording ECS fake used by the action tests

use crate::client::{EcsApi, RpcRequest};
use async_trait::async_trait;
use faultflow_cloud::flags::{ACCESS_KEY_ID, ACCESS_KEY_SECRET, REGION_ID, TYPE};
use faultflow_cloud::{ActionFlags, Channel, CloudError, ResourceIdentity};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct FakeEcs {
    responses: Mutex<HashMap<&'static str, Result<Value, (String, String)>>>,
    calls: Mutex<Vec<RpcRequest>>,
}

impl FakeEcs {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(self: &Arc<Self>, action: &'static str, body: Value) -> Arc<Self> {
        self.responses.lock().unwrap().insert(action, Ok(body));
        self.clone()
    }

    pub fn fail(self: &Arc<Self>, action: &'static str, code: &str, message: &str) -> Arc<Self> {
        self.responses
            .lock()
            .unwrap()
            .insert(action, Err((code.to_string(), message.to_string())));
        self.clone()
    }

    pub fn calls(&self) -> Vec<RpcRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn actions(&self) -> Vec<&'static str> {
        self.calls().iter().map(|c| c.action).collect()
    }

    /// The single call made for `action`
    pub fn call(&self, action: &str) -> RpcRequest {
        let calls: Vec<_> = self
            .calls()
            .into_iter()
            .filter(|c| c.action == action)
            .collect();
        assert_eq!(calls.len(), 1, "expected one {} call", action);
        calls.into_iter().next().unwrap()
    }
}

#[async_trait]
impl EcsApi for FakeEcs {
    async fn call(&self, request: RpcRequest) -> Result<Value, CloudError> {
        let action = request.action;
        self.calls.lock().unwrap().push(request);
        match self.responses.lock().unwrap().get(action) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err((code, message))) => Err(CloudError::Api {
                code: code.clone(),
                message: message.clone(),
            }),
            None => Ok(json!({"RequestId": "fake-request"})),
        }
    }
}

pub struct FakeChannel(pub Arc<FakeEcs>);

#[async_trait]
impl Channel for FakeChannel {
    type Client = dyn EcsApi;

    fn provider(&self) -> &'static str {
        "aliyun"
    }

    async fn connect(&self, _identity: &ResourceIdentity) -> Result<Arc<dyn EcsApi>, CloudError> {
        let client: Arc<dyn EcsApi> = self.0.clone();
        Ok(client)
    }
}

pub fn channel(ecs: &Arc<FakeEcs>) -> Arc<FakeChannel> {
    Arc::new(FakeChannel(ecs.clone()))
}

/// Flags with credentials, `regionId=cn-hangzhou` and the given extras
pub fn flags(op: &str, extra: &[(&str, &str)]) -> ActionFlags {
    let mut flags = ActionFlags::new()
        .with(ACCESS_KEY_ID, "id")
        .with(ACCESS_KEY_SECRET, "secret")
        .with(REGION_ID, "cn-hangzhou")
        .with(TYPE, op);
    for (k, v) in extra {
        flags.set(*k, *v);
    }
    flags
}
