// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use super::{validate_name, PortRef, ResourceDescriptor, ResourceKind, ResourceSpec};
use crate::error::{ReconcileError, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{json, Map, Value};

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct ServicePortSpec {
    #[serde(default)]
    pub name: Option<String>,
    pub port: i32,
    #[serde(default, alias = "targetPort")]
    pub target_port: Option<PortRef>,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default, alias = "nodePort")]
    pub node_port: Option<i32>,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct ServiceSpec {
    #[serde(alias = "service_name")]
    pub name: String,
    #[serde(default)]
    pub labels: Option<IndexMap<String, String>>,
    #[serde(default)]
    pub ports: Vec<ServicePortSpec>,
    #[serde(default)]
    pub selector: IndexMap<String, String>,
    #[serde(default, alias = "loadbalancer")]
    pub load_balancer: bool,
}

impl ResourceSpec for ServiceSpec {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Service
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn build(&self, namespace: &str) -> Result<ResourceDescriptor> {
        validate_name("Service", &self.name)?;
        if self.ports.is_empty() {
            return Err(ReconcileError::Validation(format!(
                "Service {} requires at least one port",
                self.name
            )));
        }
        if self.selector.is_empty() {
            return Err(ReconcileError::Validation(format!(
                "Service {} requires a selector",
                self.name
            )));
        }

        let mut spec = Map::new();
        spec.insert("selector".to_string(), json!(self.selector));
        spec.insert("ports".to_string(), Value::Array(name_ports(&self.ports)));
        if self.load_balancer {
            spec.insert("type".to_string(), Value::from("LoadBalancer"));
        }

        let mut body = Map::new();
        body.insert("spec".to_string(), Value::Object(spec));

        Ok(ResourceDescriptor::new(self.kind(), &self.name, namespace, body)
            .labels(self.labels.as_ref()))
    }
}

/// Render service ports, naming unnamed ones `port0`, `port1`, ... in input
/// order. The counter only advances on ports that needed a name.
pub fn name_ports(ports: &[ServicePortSpec]) -> Vec<Value> {
    let mut count = 0;
    ports
        .iter()
        .map(|port| {
            let name = match port.name.as_deref().filter(|n| !n.is_empty()) {
                Some(name) => name.to_string(),
                None => {
                    let generated = format!("port{}", count);
                    count += 1;
                    generated
                }
            };

            let mut out = Map::new();
            out.insert("name".to_string(), Value::from(name));
            out.insert("port".to_string(), Value::from(port.port));
            if let Some(target_port) = &port.target_port {
                out.insert("targetPort".to_string(), json!(target_port));
            }
            if let Some(protocol) = &port.protocol {
                out.insert("protocol".to_string(), Value::from(protocol.as_str()));
            }
            if let Some(node_port) = port.node_port {
                out.insert("nodePort".to_string(), Value::from(node_port));
            }
            Value::Object(out)
        })
        .collect()
}
