// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use super::{validate_name, ResourceDescriptor, ResourceKind, ResourceSpec};
use crate::error::{ReconcileError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeploymentStrategy {
    #[default]
    Rolling,
    Recreate,
}

impl DeploymentStrategy {
    fn as_str(&self) -> &'static str {
        match self {
            DeploymentStrategy::Rolling => "Rolling",
            DeploymentStrategy::Recreate => "Recreate",
        }
    }
}

/// A container of the pod template
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct ContainerSpec {
    pub name: String,
    pub image: String,
    /// Environment variables, kept in insertion order
    #[serde(default)]
    pub env: IndexMap<String, String>,
    /// Container ports
    #[serde(default)]
    pub ports: Vec<i32>,
    /// Any other container field, passed through unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct DeploymentConfigSpec {
    #[serde(alias = "deployment_name")]
    pub name: String,
    #[serde(default)]
    pub labels: Option<IndexMap<String, String>>,
    #[serde(default = "default_replicas")]
    pub replicas: i32,
    #[serde(default)]
    pub containers: Vec<ContainerSpec>,
    #[serde(default)]
    pub strategy: DeploymentStrategy,
    #[serde(default)]
    pub volumes: Option<Vec<Value>>,
}

fn default_replicas() -> i32 {
    1
}

impl ResourceSpec for DeploymentConfigSpec {
    fn kind(&self) -> ResourceKind {
        ResourceKind::DeploymentConfig
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn build(&self, namespace: &str) -> Result<ResourceDescriptor> {
        validate_name("DeploymentConfig", &self.name)?;
        if self.containers.is_empty() {
            return Err(ReconcileError::Validation(format!(
                "DeploymentConfig {} requires at least one container",
                self.name
            )));
        }
        if self.replicas < 0 {
            return Err(ReconcileError::Validation(format!(
                "DeploymentConfig {} has negative replicas",
                self.name
            )));
        }

        let containers = self
            .containers
            .iter()
            .map(container_to_json)
            .collect::<Result<Vec<_>>>()?;

        let mut pod_metadata = Map::new();
        if let Some(labels) = self.labels.as_ref().filter(|l| !l.is_empty()) {
            pod_metadata.insert("labels".to_string(), json!(labels));
        }

        let mut pod_spec = Map::new();
        pod_spec.insert("containers".to_string(), Value::Array(containers));
        if let Some(volumes) = &self.volumes {
            pod_spec.insert("volumes".to_string(), Value::Array(volumes.clone()));
        }

        let mut body = Map::new();
        body.insert(
            "spec".to_string(),
            json!({
                "template": {
                    "metadata": pod_metadata,
                    "spec": pod_spec,
                },
                "replicas": self.replicas,
                "strategy": { "type": self.strategy.as_str() },
            }),
        );

        Ok(ResourceDescriptor::new(self.kind(), &self.name, namespace, body)
            .labels(self.labels.as_ref()))
    }
}

fn container_to_json(container: &ContainerSpec) -> Result<Value> {
    if container.name.is_empty() || container.image.is_empty() {
        return Err(ReconcileError::Validation(
            "Every container needs a name and an image".to_string(),
        ));
    }

    let mut out = Map::new();
    out.insert("name".to_string(), Value::from(container.name.as_str()));
    out.insert("image".to_string(), Value::from(container.image.as_str()));
    for (key, value) in &container.extra {
        out.insert(key.clone(), value.clone());
    }
    if !container.env.is_empty() {
        out.insert("env".to_string(), Value::Array(env_to_list(&container.env)));
    }
    if !container.ports.is_empty() {
        out.insert(
            "ports".to_string(),
            Value::Array(ports_to_container_ports(&container.ports)),
        );
    }
    Ok(Value::Object(out))
}

/// Convert an environment mapping into `[{name, value}]` in insertion order
pub fn env_to_list(env: &IndexMap<String, String>) -> Vec<Value> {
    env.iter()
        .map(|(name, value)| json!({ "name": name, "value": value }))
        .collect()
}

pub fn ports_to_container_ports(ports: &[i32]) -> Vec<Value> {
    ports
        .iter()
        .map(|port| json!({ "containerPort": port }))
        .collect()
}
