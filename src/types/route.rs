// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use super::{validate_name, PortRef, ResourceDescriptor, ResourceKind, ResourceSpec};
use crate::error::{ReconcileError, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{json, Map, Value};

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct RouteSpec {
    #[serde(alias = "route_name")]
    pub name: String,
    #[serde(default)]
    pub labels: Option<IndexMap<String, String>>,
    #[serde(default)]
    pub host: Option<String>,
    /// Service the route points at
    #[serde(default, alias = "to")]
    pub service_name: String,
    /// Target port on that service, by number or name
    #[serde(default, alias = "port")]
    pub service_port: Option<PortRef>,
}

impl ResourceSpec for RouteSpec {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Route
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn build(&self, namespace: &str) -> Result<ResourceDescriptor> {
        validate_name("Route", &self.name)?;
        validate_name("Route target service", &self.service_name)?;
        let port = match &self.service_port {
            Some(PortRef::Name(name)) if name.is_empty() => None,
            other => other.as_ref(),
        };
        let Some(port) = port else {
            return Err(ReconcileError::Validation(format!(
                "Route {} requires a target port",
                self.name
            )));
        };

        let mut spec = Map::new();
        if let Some(host) = self.host.as_ref().filter(|h| !h.is_empty()) {
            spec.insert("host".to_string(), Value::from(host.as_str()));
        }
        spec.insert(
            "to".to_string(),
            json!({ "kind": "Service", "name": self.service_name }),
        );
        spec.insert(
            "port".to_string(),
            json!({ "targetPort": port }),
        );

        let mut body = Map::new();
        body.insert("spec".to_string(), Value::Object(spec));

        Ok(ResourceDescriptor::new(self.kind(), &self.name, namespace, body)
            .labels(self.labels.as_ref()))
    }
}
