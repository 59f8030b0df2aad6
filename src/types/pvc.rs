// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use super::{validate_name, ResourceDescriptor, ResourceKind, ResourceSpec};
use crate::constants::DEFAULT_REQUESTED_STORAGE;
use crate::error::{ReconcileError, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{json, Map, Value};

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct PersistentVolumeClaimSpec {
    pub name: String,
    #[serde(default)]
    pub labels: Option<IndexMap<String, String>>,
    #[serde(default)]
    pub annotations: Option<IndexMap<String, String>>,
    #[serde(default)]
    pub access_modes: Option<Vec<String>>,
    #[serde(default = "default_requested_storage")]
    pub requested_storage: String,
    #[serde(default)]
    pub match_labels: Option<IndexMap<String, String>>,
    #[serde(default)]
    pub match_expressions: Option<Vec<Value>>,
    #[serde(default)]
    pub volume_name: Option<String>,
}

fn default_requested_storage() -> String {
    DEFAULT_REQUESTED_STORAGE.to_string()
}

impl ResourceSpec for PersistentVolumeClaimSpec {
    fn kind(&self) -> ResourceKind {
        ResourceKind::PersistentVolumeClaim
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn build(&self, namespace: &str) -> Result<ResourceDescriptor> {
        validate_name("PersistentVolumeClaim", &self.name)?;
        if self.requested_storage.trim().is_empty() {
            return Err(ReconcileError::Validation(format!(
                "PersistentVolumeClaim {} requires a storage quantity",
                self.name
            )));
        }

        let mut spec = Map::new();
        if let Some(modes) = self.access_modes.as_ref().filter(|m| !m.is_empty()) {
            spec.insert("accessModes".to_string(), json!(modes));
        }
        spec.insert(
            "resources".to_string(),
            json!({ "requests": { "storage": self.requested_storage } }),
        );
        if let Some(selector) = self.selector() {
            spec.insert("selector".to_string(), selector);
        }
        if let Some(volume_name) = &self.volume_name {
            spec.insert("volumeName".to_string(), Value::from(volume_name.as_str()));
        }

        let mut body = Map::new();
        body.insert("spec".to_string(), Value::Object(spec));

        Ok(ResourceDescriptor::new(self.kind(), &self.name, namespace, body)
            .labels(self.labels.as_ref())
            .annotations(self.annotations.as_ref()))
    }
}

impl PersistentVolumeClaimSpec {
    fn selector(&self) -> Option<Value> {
        let mut selector = Map::new();
        if let Some(labels) = self.match_labels.as_ref().filter(|l| !l.is_empty()) {
            selector.insert("matchLabels".to_string(), json!(labels));
        }
        if let Some(expressions) = self.match_expressions.as_ref().filter(|e| !e.is_empty()) {
            selector.insert("matchExpressions".to_string(), Value::Array(expressions.clone()));
        }
        (!selector.is_empty()).then_some(Value::Object(selector))
    }
}
