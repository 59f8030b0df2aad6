// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test doubles for the cluster: a mocked API server, a scripted command
//! runner and an in-memory cluster.

use crate::error::{ReconcileError, Result};
use crate::kubernetes::{CliRequest, ClusterClient, CommandOutput, CommandRunner};
use crate::types::{ResourceDescriptor, ResourceKind};
use async_trait::async_trait;
use http::{Request, Response};
use kube::client::Body;
use kube::Client;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

/// A mock HTTP service that returns predefined responses based on request paths.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses.lock().unwrap().insert(
            (method.to_string(), path.to_string()),
            (status, body.to_string()),
        );
        self
    }

    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.on("POST", path, status, body)
    }

    pub fn on_put(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PUT", path, status, body)
    }

    pub fn on_delete(self, path: &str, status: u16, body: &str) -> Self {
        self.on("DELETE", path, status, body)
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    fn find_response(&self, method: &str, path: &str) -> Option<(u16, String)> {
        self.responses
            .lock()
            .unwrap()
            .get(&(method.to_string(), path.to_string()))
            .cloned()
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = std::result::Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();

        let (status, body) = self
            .find_response(&method, &path)
            .unwrap_or_else(|| (404, not_found_json("resource", &path)));

        Box::pin(async move {
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// Create a mock namespace JSON response
pub fn namespace_json(name: &str) -> String {
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Namespace",
        "metadata": {
            "name": name,
            "uid": "test-uid"
        }
    })
    .to_string()
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    status_json(404, "NotFound", &format!("{} \"{}\" not found", resource, name))
}

/// Create a failure Status response
pub fn status_json(code: u16, reason: &str, message: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code
    })
    .to_string()
}

/// Command runner that replays queued outputs and records every request
#[derive(Clone, Default)]
pub struct ScriptedRunner {
    outputs: Arc<Mutex<VecDeque<CommandOutput>>>,
    requests: Arc<Mutex<Vec<CliRequest>>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, exit_code: i32, stdout: &str, stderr: &str) -> Self {
        self.outputs.lock().unwrap().push_back(CommandOutput {
            exit_code,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        });
        self
    }

    pub fn requests(&self) -> Vec<CliRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, _binary: &str, request: &CliRequest) -> Result<CommandOutput> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(self
            .outputs
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(CommandOutput {
                exit_code: 1,
                stdout: String::new(),
                stderr: "no scripted response".to_string(),
            }))
    }
}

type ObjectKey = (String, String, String);

/// In-memory cluster that records every call as `"<verb> <Kind>/<name>"`
/// or `"<verb> namespace <name>"`
#[derive(Default)]
pub struct FakeCluster {
    objects: Mutex<BTreeMap<ObjectKey, Value>>,
    namespaces: Mutex<BTreeSet<String>>,
    calls: Mutex<Vec<String>>,
    failures: Vec<String>,
    namespace_race: bool,
}

impl FakeCluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_namespace(self, namespace: &str) -> Self {
        self.namespaces.lock().unwrap().insert(namespace.to_string());
        self
    }

    /// Seed a live object from its manifest; its namespace exists too
    pub fn with_object(self, manifest: Value) -> Self {
        let key = key_of(&manifest);
        self.namespaces.lock().unwrap().insert(key.1.clone());
        self.objects.lock().unwrap().insert(key, manifest);
        self
    }

    /// Fail every call whose description starts with `prefix`
    pub fn fail_on(mut self, prefix: &str) -> Self {
        self.failures.push(prefix.to_string());
        self
    }

    /// Namespace creation fails as if another writer created it first
    pub fn with_namespace_race(mut self) -> Self {
        self.namespace_race = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn has_namespace(&self, namespace: &str) -> bool {
        self.namespaces.lock().unwrap().contains(namespace)
    }

    pub fn object(&self, kind: ResourceKind, namespace: &str, name: &str) -> Option<Value> {
        self.objects
            .lock()
            .unwrap()
            .get(&(kind.to_string(), namespace.to_string(), name.to_string()))
            .cloned()
    }

    fn record(&self, call: String) -> Result<()> {
        self.calls.lock().unwrap().push(call.clone());
        if self.failures.iter().any(|prefix| call.starts_with(prefix)) {
            return Err(ReconcileError::Transport {
                command: call,
                stdout: String::new(),
                stderr: "injected failure".to_string(),
                exit_code: 1,
            });
        }
        Ok(())
    }
}

fn key_of(manifest: &Value) -> ObjectKey {
    let field = |pointer: &str| {
        manifest
            .pointer(pointer)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    (
        field("/kind"),
        field("/metadata/namespace"),
        field("/metadata/name"),
    )
}

#[async_trait]
impl ClusterClient for FakeCluster {
    async fn get(&self, kind: ResourceKind, namespace: &str, name: &str) -> Result<Option<Value>> {
        self.record(format!("get {}/{}", kind, name))?;
        Ok(self.object(kind, namespace, name))
    }

    async fn create(&self, descriptor: &ResourceDescriptor) -> Result<Value> {
        self.record(format!("create {}/{}", descriptor.kind(), descriptor.name()))?;
        let manifest = descriptor.to_manifest();
        let mut objects = self.objects.lock().unwrap();
        let key = key_of(&manifest);
        if objects.contains_key(&key) {
            return Err(ReconcileError::AlreadyExists {
                kind: descriptor.kind().to_string(),
                name: descriptor.name().to_string(),
                command: format!("create {}/{}", descriptor.kind(), descriptor.name()),
                stderr: "object already exists".to_string(),
            });
        }
        objects.insert(key, manifest.clone());
        Ok(manifest)
    }

    async fn replace(&self, descriptor: &ResourceDescriptor) -> Result<Value> {
        self.record(format!("replace {}/{}", descriptor.kind(), descriptor.name()))?;
        let manifest = descriptor.to_manifest();
        self.objects
            .lock()
            .unwrap()
            .insert(key_of(&manifest), manifest.clone());
        Ok(manifest)
    }

    async fn delete(&self, kind: ResourceKind, namespace: &str, name: &str) -> Result<()> {
        self.record(format!("delete {}/{}", kind, name))?;
        self.objects
            .lock()
            .unwrap()
            .remove(&(kind.to_string(), namespace.to_string(), name.to_string()))
            .map(|_| ())
            .ok_or_else(|| ReconcileError::NotFound {
                kind: kind.to_string(),
                name: name.to_string(),
                command: format!("delete {}/{}", kind, name),
                stderr: "object not found".to_string(),
            })
    }

    async fn namespace_exists(&self, namespace: &str) -> Result<bool> {
        self.record(format!("get namespace {}", namespace))?;
        Ok(self.has_namespace(namespace))
    }

    async fn create_namespace(&self, namespace: &str) -> Result<()> {
        self.record(format!("create namespace {}", namespace))?;
        if self.namespace_race || !self.namespaces.lock().unwrap().insert(namespace.to_string()) {
            return Err(ReconcileError::AlreadyExists {
                kind: "namespace".to_string(),
                name: namespace.to_string(),
                command: format!("create namespace {}", namespace),
                stderr: "namespace already exists".to_string(),
            });
        }
        Ok(())
    }
}
