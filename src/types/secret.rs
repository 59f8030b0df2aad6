// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use super::{validate_name, ResourceDescriptor, ResourceKind, ResourceSpec};
use crate::error::{ReconcileError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};

/// An opaque secret built from literal key/value pairs
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct SecretSpec {
    pub name: String,
    #[serde(default)]
    pub labels: Option<IndexMap<String, String>>,
    #[serde(default)]
    pub data: IndexMap<String, String>,
    #[serde(default = "default_secret_type", rename = "type")]
    pub secret_type: String,
}

fn default_secret_type() -> String {
    "Opaque".to_string()
}

impl SecretSpec {
    /// Parse `KEY=VALUE` literals; the value may itself contain '='
    pub fn from_literals(name: &str, literals: &[String]) -> Result<Self> {
        let mut data = IndexMap::new();
        for literal in literals {
            let Some((key, value)) = literal.split_once('=') else {
                return Err(ReconcileError::Validation(format!(
                    "Secret literal '{}' is not of the form KEY=VALUE",
                    literal
                )));
            };
            data.insert(key.to_string(), value.to_string());
        }

        Ok(SecretSpec {
            name: name.to_string(),
            labels: None,
            data,
            secret_type: default_secret_type(),
        })
    }
}

impl ResourceSpec for SecretSpec {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Secret
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn build(&self, namespace: &str) -> Result<ResourceDescriptor> {
        validate_name("Secret", &self.name)?;
        if let Some(key) = self.data.keys().find(|k| k.is_empty()) {
            return Err(ReconcileError::Validation(format!(
                "Secret {} has an invalid key '{}'",
                self.name, key
            )));
        }

        let data: Map<String, Value> = self
            .data
            .iter()
            .map(|(k, v)| (k.clone(), Value::from(STANDARD.encode(v))))
            .collect();

        let mut body = Map::new();
        body.insert("type".to_string(), Value::from(self.secret_type.as_str()));
        body.insert("data".to_string(), Value::Object(data));

        Ok(ResourceDescriptor::new(self.kind(), &self.name, namespace, body)
            .labels(self.labels.as_ref()))
    }
}
