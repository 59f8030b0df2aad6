// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Loading of resource documents from YAML files.
//!
//! A file holds one or more YAML documents, each a resource configuration
//! tagged by `kind`, with optional `namespace` and `state` keys:
//!
//! ```yaml
//! kind: Service
//! namespace: shop
//! name: web
//! ports:
//!   - port: 80
//! selector:
//!   app: web
//! ---
//! kind: Route
//! state: absent
//! name: legacy
//! ```

use crate::error::{ReconcileError, Result};
use crate::reconcilers::DesiredState;
use crate::types::{ResourceConfig, ResourceSpec};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum State {
    #[default]
    Present,
    Absent,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct ResourceDocument {
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub state: State,
    #[serde(flatten)]
    pub resource: ResourceConfig,
}

impl ResourceDocument {
    /// Build the desired state; `namespace` overrides the document's own
    pub fn desired_state(&self, namespace: Option<&str>) -> Result<DesiredState> {
        let namespace = namespace
            .or(self.namespace.as_deref())
            .ok_or_else(|| {
                ReconcileError::Validation(format!(
                    "{} {} has no namespace; set one in the file or pass --namespace",
                    self.resource.kind(),
                    self.resource.name()
                ))
            })?;

        match self.state {
            State::Present => Ok(DesiredState::Present(self.resource.build(namespace)?)),
            State::Absent => {
                DesiredState::absent(self.resource.kind(), namespace, self.resource.name())
            }
        }
    }
}

/// Parse every document of a multi-document YAML string
pub fn parse_documents(content: &str) -> Result<Vec<ResourceDocument>> {
    let mut documents = Vec::new();
    for document in serde_yaml::Deserializer::from_str(content) {
        let value = serde_yaml::Value::deserialize(document)?;
        if value.is_null() {
            continue;
        }
        documents.push(serde_yaml::from_value(value)?);
    }

    if documents.is_empty() {
        return Err(ReconcileError::Validation(
            "No resources found in input".to_string(),
        ));
    }
    Ok(documents)
}

/// Load documents from a file, or from stdin when the path is `-`
pub fn load_documents(path: &Path) -> Result<Vec<ResourceDocument>> {
    let content = if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(path)?
    };
    parse_documents(&content)
}

/// Build the desired states of all documents. Runs before any cluster call,
/// so an invalid document aborts the run without side effects.
pub fn desired_states(
    documents: &[ResourceDocument],
    namespace: Option<&str>,
) -> Result<Vec<DesiredState>> {
    documents
        .iter()
        .map(|document| document.desired_state(namespace))
        .collect()
}
