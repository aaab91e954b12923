#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

//! Common test utilities for resources integration tests

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use depot_utils::SecretString;
use parking_lot::Mutex;
use resources::domain::{ListController, NoticeLevel, Notifier};
use resources_sdk::{
    CreateRequest, Credentials, LoginResponse, Resource, ResourceError, ResourceGateway,
    ResourceId, ResourceKind, SessionGateway, UpdateAction, UpdateRequest, decode,
};
use serde_json::{Value, json};
use tokio::sync::Notify;

/// In-memory backend with scripted failures and gates.
#[derive(Default)]
pub struct FakeGateway {
    store: Mutex<HashMap<ResourceKind, Vec<Value>>>,
    failures: Mutex<Vec<(&'static str, ResourceError)>>,
    gates: Mutex<HashMap<&'static str, Arc<Notify>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_items(&self, kind: ResourceKind, items: Vec<Value>) {
        self.store.lock().insert(kind, items);
    }

    pub fn items(&self, kind: ResourceKind) -> Vec<Value> {
        self.store.lock().get(&kind).cloned().unwrap_or_default()
    }

    /// Make the next `op` call fail with `err`.
    pub fn fail_next(&self, op: &'static str, err: ResourceError) {
        self.failures.lock().push((op, err));
    }

    /// Block the next `op` call until the returned gate is notified.
    pub fn hold(&self, op: &'static str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates.lock().insert(op, gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self, op: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.split(' ').next() == Some(op))
            .count()
    }

    async fn enter(&self, op: &'static str, call: String) -> Result<(), ResourceError> {
        self.calls.lock().push(call);
        let gate = self.gates.lock().remove(op);
        if let Some(gate) = gate {
            gate.notified().await;
        }
        let mut failures = self.failures.lock();
        if let Some(pos) = failures.iter().position(|(o, _)| *o == op) {
            return Err(failures.remove(pos).1);
        }
        Ok(())
    }
}

#[async_trait]
impl ResourceGateway for FakeGateway {
    async fn list(&self, kind: ResourceKind) -> Result<Vec<Value>, ResourceError> {
        self.enter("list", format!("list {kind}")).await?;
        Ok(self.items(kind))
    }

    async fn get(&self, kind: ResourceKind, id: &ResourceId) -> Result<Value, ResourceError> {
        self.enter("get", format!("get {kind} {id}")).await?;
        self.items(kind)
            .into_iter()
            .find(|item| ResourceId::of_object(item).as_ref() == Some(id))
            .ok_or_else(|| ResourceError::not_found(kind, id.clone()))
    }

    async fn create(
        &self,
        kind: ResourceKind,
        request: CreateRequest,
    ) -> Result<Value, ResourceError> {
        self.enter("create", format!("create {kind}")).await?;
        let mut store = self.store.lock();
        let items = store.entry(kind).or_default();
        let next = items
            .iter()
            .filter_map(|item| item["id"].as_i64())
            .max()
            .unwrap_or(0)
            + 1;
        let mut item = request.payload;
        item["id"] = json!(next);
        items.push(item.clone());
        Ok(item)
    }

    async fn update(
        &self,
        kind: ResourceKind,
        id: &ResourceId,
        request: UpdateRequest,
    ) -> Result<Value, ResourceError> {
        self.enter("update", format!("update {kind} {id} {}", request.action.as_str()))
            .await?;
        let mut store = self.store.lock();
        let item = store
            .get_mut(&kind)
            .and_then(|items| {
                items
                    .iter_mut()
                    .find(|item| ResourceId::of_object(item).as_ref() == Some(id))
            })
            .ok_or_else(|| ResourceError::rejected(404, "Not found"))?;
        if let (Some(target), Some(patch)) = (item.as_object_mut(), request.body.as_object()) {
            for (key, value) in patch {
                target.insert(key.clone(), value.clone());
            }
            match request.action {
                UpdateAction::Reply => {
                    target.insert("replied".to_owned(), json!(true));
                }
                UpdateAction::Approve => {
                    target.insert("status".to_owned(), json!("Approved"));
                }
                _ => {}
            }
        }
        Ok(item.clone())
    }

    async fn remove(&self, kind: ResourceKind, id: &ResourceId) -> Result<(), ResourceError> {
        self.enter("remove", format!("remove {kind} {id}")).await?;
        if let Some(items) = self.store.lock().get_mut(&kind) {
            items.retain(|item| ResourceId::of_object(item).as_ref() != Some(id));
        }
        Ok(())
    }
}

/// Session backend answering every login with a fixed outcome.
pub struct FakeSessions {
    pub outcome: Result<Value, ResourceError>,
    pub logins: Mutex<Vec<String>>,
}

impl FakeSessions {
    pub fn accepting(employee: Value) -> Self {
        Self {
            outcome: Ok(json!({"token": "tok-123", "message": "Login successful", "employee": employee})),
            logins: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting(status: u16, message: &str) -> Self {
        Self {
            outcome: Err(ResourceError::rejected(status, message)),
            logins: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SessionGateway for FakeSessions {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ResourceError> {
        self.logins.lock().push(credentials.email.clone());
        decode(self.outcome.clone()?)
    }
}

/// Notifier keeping every notice for assertions.
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<(NoticeLevel, String)>>,
}

impl RecordingNotifier {
    pub fn errors(&self) -> Vec<String> {
        self.by_level(NoticeLevel::Error)
    }

    pub fn successes(&self) -> Vec<String> {
        self.by_level(NoticeLevel::Success)
    }

    fn by_level(&self, level: NoticeLevel) -> Vec<String> {
        self.notices
            .lock()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        self.notices.lock().push((level, message.to_owned()));
    }
}

pub struct Harness<R: Resource> {
    pub gateway: Arc<FakeGateway>,
    pub notifier: Arc<RecordingNotifier>,
    pub controller: Arc<ListController<R>>,
}

pub fn harness<R: Resource>(items: Vec<Value>) -> Harness<R> {
    let gateway = FakeGateway::new();
    gateway.set_items(R::KIND, items);
    let notifier = Arc::new(RecordingNotifier::default());
    let controller = Arc::new(ListController::new(gateway.clone(), notifier.clone()));
    Harness {
        gateway,
        notifier,
        controller,
    }
}

pub fn ids<R: Resource>(items: &[R]) -> Vec<ResourceId> {
    items.iter().map(Resource::id).collect()
}

pub fn secret(value: &str) -> SecretString {
    SecretString::new(value)
}
