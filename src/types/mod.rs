// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Typed resource configurations and the descriptors built from them.

pub mod deployment;
pub mod descriptor;
pub mod pvc;
pub mod route;
pub mod secret;
pub mod service;

pub use deployment::{ContainerSpec, DeploymentConfigSpec, DeploymentStrategy};
pub use descriptor::{ResourceDescriptor, ResourceKind};
pub use pvc::PersistentVolumeClaimSpec;
pub use route::RouteSpec;
pub use secret::SecretSpec;
pub use service::{ServicePortSpec, ServiceSpec};

use crate::error::{ReconcileError, Result};
use serde::{Deserialize, Serialize};

/// Capability shared by every typed resource configuration: it names the
/// resource it describes and renders it into a descriptor.
pub trait ResourceSpec {
    fn kind(&self) -> ResourceKind;

    fn name(&self) -> &str;

    /// Build the canonical descriptor for this resource. Must be pure.
    fn build(&self, namespace: &str) -> Result<ResourceDescriptor>;
}

/// A port reference that is either a number or a named port
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum PortRef {
    Number(i32),
    Name(String),
}

/// Any of the supported resource configurations, tagged by `kind`
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind")]
pub enum ResourceConfig {
    DeploymentConfig(DeploymentConfigSpec),
    PersistentVolumeClaim(PersistentVolumeClaimSpec),
    Route(RouteSpec),
    Service(ServiceSpec),
    Secret(SecretSpec),
}

impl ResourceConfig {
    fn as_spec(&self) -> &dyn ResourceSpec {
        match self {
            ResourceConfig::DeploymentConfig(s) => s,
            ResourceConfig::PersistentVolumeClaim(s) => s,
            ResourceConfig::Route(s) => s,
            ResourceConfig::Service(s) => s,
            ResourceConfig::Secret(s) => s,
        }
    }
}

impl ResourceSpec for ResourceConfig {
    fn kind(&self) -> ResourceKind {
        self.as_spec().kind()
    }

    fn name(&self) -> &str {
        self.as_spec().name()
    }

    fn build(&self, namespace: &str) -> Result<ResourceDescriptor> {
        self.as_spec().build(namespace)
    }
}

/// Validate a resource or namespace name: lowercase alphanumerics, '-' and
/// '.', starting and ending with an alphanumeric, at most 253 characters.
pub fn validate_name(what: &str, name: &str) -> Result<()> {
    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.');
    let valid_edges = name
        .chars()
        .next()
        .zip(name.chars().last())
        .is_some_and(|(first, last)| first.is_ascii_alphanumeric() && last.is_ascii_alphanumeric());

    if name.is_empty() || name.len() > 253 || !valid_chars || !valid_edges {
        return Err(ReconcileError::Validation(format!(
            "{} name '{}' must consist of lowercase alphanumerics, '-' or '.'",
            what, name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name_accepts_dns_names() {
        assert!(validate_name("Service", "web").is_ok());
        assert!(validate_name("Service", "my-app.v2").is_ok());
        assert!(validate_name("Service", "a1").is_ok());
    }

    #[test]
    fn test_validate_name_rejects_bad_names() {
        for name in ["", "Web", "-web", "web-", "my_app", "a b"] {
            let err = validate_name("Service", name).unwrap_err();
            assert!(matches!(err, ReconcileError::Validation(_)), "{name}");
        }
    }

    #[test]
    fn test_resource_config_deserializes_by_kind() {
        let config: ResourceConfig = serde_yaml::from_str(
            r#"
kind: Route
name: frontend
service_name: frontend
service_port: 8080
"#,
        )
        .unwrap();

        assert_eq!(config.kind(), ResourceKind::Route);
        assert_eq!(config.name(), "frontend");
    }

    #[test]
    fn test_resource_config_unknown_kind_is_rejected() {
        let result: std::result::Result<ResourceConfig, _> =
            serde_yaml::from_str("kind: ConfigMap\nname: settings\n");
        assert!(result.is_err());
    }
}
