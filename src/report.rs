// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Machine-readable summary of a run, printed as JSON on stdout.

use crate::reconcilers::ReconcileResult;
use crate::types::ResourceKind;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize, Debug, Default, Clone, PartialEq)]
pub struct Report {
    pub changed: bool,
    pub actions: Vec<String>,
    /// Resulting state per resource, keyed `<namespace>/<name>_<kind>` with
    /// '-' in the name as '_'
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub resources: IndexMap<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of ensuring a namespace
    pub fn record_namespace(&mut self, noun: &str, namespace: &str, existed: bool) {
        if !existed {
            self.changed = true;
            self.actions.push(format!("Create {} {}", noun, namespace));
        }
    }

    pub fn record(
        &mut self,
        kind: ResourceKind,
        namespace: &str,
        name: &str,
        result: &ReconcileResult,
    ) {
        if result.changed {
            self.changed = true;
            self.actions.push(result.decision.description.clone());
        }
        if let Some(state) = &result.resulting_state {
            self.resources
                .insert(resource_key(kind, namespace, name), state.clone());
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Key under which a resource's state is reported, e.g. `shop/my_app_service`
pub fn resource_key(kind: ResourceKind, namespace: &str, name: &str) -> String {
    let suffix = match kind {
        ResourceKind::DeploymentConfig => "deployment",
        ResourceKind::PersistentVolumeClaim => "pvc",
        ResourceKind::Route => "route",
        ResourceKind::Service => "service",
        ResourceKind::Secret => "secret",
    };
    format!("{}/{}_{}", namespace, name.replace('-', "_"), suffix)
}
