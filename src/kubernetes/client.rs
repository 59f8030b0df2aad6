// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster client abstraction and construction from configuration

use crate::config::{Config, Transport};
use crate::error::{ReconcileError, Result};
use crate::kubernetes::api::ApiClusterClient;
use crate::kubernetes::cli::{CliClusterClient, ProcessRunner};
use crate::types::{ResourceDescriptor, ResourceKind};
use async_trait::async_trait;
use kube::{config::KubeConfigOptions, Client, Config as KConfig};
use serde_json::Value;
use tracing::{debug, info};

/// The only component that reads or writes cluster state.
///
/// `get` reports a missing resource as `Ok(None)`; every other failure is
/// returned unchanged. Mutating calls never alter the descriptor they are
/// given.
#[async_trait]
pub trait ClusterClient: Send + Sync {
    async fn get(&self, kind: ResourceKind, namespace: &str, name: &str) -> Result<Option<Value>>;

    async fn create(&self, descriptor: &ResourceDescriptor) -> Result<Value>;

    async fn replace(&self, descriptor: &ResourceDescriptor) -> Result<Value>;

    async fn delete(&self, kind: ResourceKind, namespace: &str, name: &str) -> Result<()>;

    async fn namespace_exists(&self, namespace: &str) -> Result<bool>;

    async fn create_namespace(&self, namespace: &str) -> Result<()>;

    /// What a namespace is called in action descriptions
    fn namespace_noun(&self) -> &'static str {
        "namespace"
    }
}

/// Create the cluster client selected by the configuration
pub async fn create_cluster_client(config: &Config) -> Result<Box<dyn ClusterClient>> {
    match config.transport {
        Transport::Cli => {
            debug!("Using {} command line transport", config.oc_binary);
            Ok(Box::new(CliClusterClient::new(
                ProcessRunner,
                &config.oc_binary,
                config.context.clone(),
                config.namespace_style,
            )))
        }
        Transport::Api => {
            let client = create_kube_client(config.context.as_deref()).await?;
            info!("Connected to Kubernetes API server");
            Ok(Box::new(ApiClusterClient::new(client)))
        }
    }
}

/// Create a Kubernetes client from the local kubeconfig or in-cluster config
async fn create_kube_client(context: Option<&str>) -> Result<Client> {
    let client_config = match context {
        Some(context) => {
            let options = KubeConfigOptions {
                context: Some(context.to_string()),
                ..Default::default()
            };
            KConfig::from_kubeconfig(&options).await.map_err(|e| {
                ReconcileError::Validation(format!(
                    "Failed to load kubeconfig context {}: {}",
                    context, e
                ))
            })?
        }
        None => KConfig::infer().await.map_err(|e| {
            ReconcileError::Validation(format!("Failed to infer cluster config: {}", e))
        })?,
    };

    Ok(Client::try_from(client_config)?)
}
