// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::error::{ReconcileError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;

/// The resource kinds this tool knows how to reconcile
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    DeploymentConfig,
    PersistentVolumeClaim,
    Route,
    Service,
    Secret,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::DeploymentConfig,
        ResourceKind::PersistentVolumeClaim,
        ResourceKind::Route,
        ResourceKind::Service,
        ResourceKind::Secret,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::DeploymentConfig => "DeploymentConfig",
            ResourceKind::PersistentVolumeClaim => "PersistentVolumeClaim",
            ResourceKind::Route => "Route",
            ResourceKind::Service => "Service",
            ResourceKind::Secret => "Secret",
        }
    }

    /// Short resource name understood by the `oc` client
    pub fn cli_name(&self) -> &'static str {
        match self {
            ResourceKind::DeploymentConfig => "dc",
            ResourceKind::PersistentVolumeClaim => "pvc",
            ResourceKind::Route => "route",
            ResourceKind::Service => "service",
            ResourceKind::Secret => "secret",
        }
    }

    /// API group; empty for the core group
    pub fn group(&self) -> &'static str {
        match self {
            ResourceKind::DeploymentConfig => "apps.openshift.io",
            ResourceKind::Route => "route.openshift.io",
            _ => "",
        }
    }

    pub fn version(&self) -> &'static str {
        "v1"
    }

    pub fn api_version(&self) -> String {
        if self.group().is_empty() {
            self.version().to_string()
        } else {
            format!("{}/{}", self.group(), self.version())
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            ResourceKind::DeploymentConfig => "deploymentconfigs",
            ResourceKind::PersistentVolumeClaim => "persistentvolumeclaims",
            ResourceKind::Route => "routes",
            ResourceKind::Service => "services",
            ResourceKind::Secret => "secrets",
        }
    }

    /// Noun used in action descriptions, e.g. "Create PVC data"
    pub fn noun(&self) -> &'static str {
        match self {
            ResourceKind::DeploymentConfig => "deployment",
            ResourceKind::PersistentVolumeClaim => "PVC",
            ResourceKind::Route => "route",
            ResourceKind::Service => "service",
            ResourceKind::Secret => "secret",
        }
    }

    /// Merge server-assigned fields of the live object into a replacement.
    ///
    /// A DeploymentConfig replacement carries `status.latestVersion` one past
    /// the live value, which makes the cluster roll out the new template.
    pub fn prepare_replace(
        &self,
        desired: &ResourceDescriptor,
        current: &Value,
    ) -> Result<ResourceDescriptor> {
        match self {
            ResourceKind::DeploymentConfig => {
                let latest = current
                    .pointer("/status/latestVersion")
                    .and_then(Value::as_i64)
                    .unwrap_or(0);
                Ok(desired.with_field(
                    "status",
                    json!({ "latestVersion": latest.saturating_add(1) }),
                ))
            }
            _ => Ok(desired.clone()),
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = ReconcileError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "deploymentconfig" | "deploymentconfigs" | "dc" | "deployment" => {
                Ok(ResourceKind::DeploymentConfig)
            }
            "persistentvolumeclaim" | "persistentvolumeclaims" | "pvc" => {
                Ok(ResourceKind::PersistentVolumeClaim)
            }
            "route" | "routes" => Ok(ResourceKind::Route),
            "service" | "services" | "svc" => Ok(ResourceKind::Service),
            "secret" | "secrets" => Ok(ResourceKind::Secret),
            _ => Err(ReconcileError::Validation(format!(
                "Unknown resource kind '{}'",
                s
            ))),
        }
    }
}

/// Canonical in-memory form of a resource manifest.
///
/// Descriptors are immutable; [`ResourceDescriptor::with_field`] returns a
/// modified copy.
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceDescriptor {
    kind: ResourceKind,
    name: String,
    namespace: String,
    labels: Option<IndexMap<String, String>>,
    annotations: Option<IndexMap<String, String>>,
    /// Top-level manifest fields other than apiVersion, kind and metadata
    body: Map<String, Value>,
}

impl ResourceDescriptor {
    pub fn new(kind: ResourceKind, name: &str, namespace: &str, body: Map<String, Value>) -> Self {
        Self {
            kind,
            name: name.to_string(),
            namespace: namespace.to_string(),
            labels: None,
            annotations: None,
            body,
        }
    }

    /// Attach labels; empty maps are dropped
    pub fn labels(mut self, labels: Option<&IndexMap<String, String>>) -> Self {
        self.labels = labels.filter(|l| !l.is_empty()).cloned();
        self
    }

    /// Attach annotations; empty maps are dropped
    pub fn annotations(mut self, annotations: Option<&IndexMap<String, String>>) -> Self {
        self.annotations = annotations.filter(|a| !a.is_empty()).cloned();
        self
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn label_map(&self) -> Option<&IndexMap<String, String>> {
        self.labels.as_ref()
    }

    pub fn spec(&self) -> Option<&Value> {
        self.body.get("spec")
    }

    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    /// Copy of this descriptor with one top-level field set
    pub fn with_field(&self, key: &str, value: Value) -> Self {
        let mut copy = self.clone();
        copy.body.insert(key.to_string(), value);
        copy
    }

    /// Render the full JSON manifest
    pub fn to_manifest(&self) -> Value {
        let mut metadata = Map::new();
        metadata.insert("name".to_string(), Value::from(self.name.as_str()));
        metadata.insert("namespace".to_string(), Value::from(self.namespace.as_str()));
        if let Some(labels) = &self.labels {
            metadata.insert("labels".to_string(), json!(labels));
        }
        if let Some(annotations) = &self.annotations {
            metadata.insert("annotations".to_string(), json!(annotations));
        }

        let mut manifest = Map::new();
        manifest.insert("apiVersion".to_string(), Value::from(self.kind.api_version()));
        manifest.insert("kind".to_string(), Value::from(self.kind.as_str()));
        manifest.insert("metadata".to_string(), Value::Object(metadata));
        for (key, value) in &self.body {
            manifest.insert(key.clone(), value.clone());
        }
        Value::Object(manifest)
    }
}
