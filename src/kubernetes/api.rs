// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster client that talks to the API server directly

use super::client::ClusterClient;
use crate::error::{ReconcileError, Result};
use crate::types::{ResourceDescriptor, ResourceKind};
use async_trait::async_trait;
use http::StatusCode;
use k8s_openapi::api::core::v1::Namespace;
use kube::{
    api::{ApiResource, DeleteParams, DynamicObject, ObjectMeta, PostParams},
    core::GroupVersionKind,
    Api, Client,
};
use serde_json::Value;
use tracing::{debug, instrument};

pub struct ApiClusterClient {
    client: Client,
}

impl ApiClusterClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn api(&self, kind: ResourceKind, namespace: &str) -> Api<DynamicObject> {
        let gvk = GroupVersionKind::gvk(kind.group(), kind.version(), kind.as_str());
        let resource = ApiResource::from_gvk_with_plural(&gvk, kind.plural());
        Api::namespaced_with(self.client.clone(), namespace, &resource)
    }
}

/// Map an API error onto the error taxonomy
fn classify_error(err: kube::Error, verb: &str, kind: &str, name: &str) -> ReconcileError {
    match err {
        kube::Error::Api(response) if response.code == StatusCode::NOT_FOUND.as_u16() => {
            ReconcileError::NotFound {
                kind: kind.to_string(),
                name: name.to_string(),
                command: format!("{} {}/{}", verb, kind, name),
                stderr: response.message,
            }
        }
        kube::Error::Api(response)
            if response.code == StatusCode::CONFLICT.as_u16()
                && response.reason == "AlreadyExists" =>
        {
            ReconcileError::AlreadyExists {
                kind: kind.to_string(),
                name: name.to_string(),
                command: format!("{} {}/{}", verb, kind, name),
                stderr: response.message,
            }
        }
        kube::Error::Api(response)
            if response.code == StatusCode::UNAUTHORIZED.as_u16()
                || response.code == StatusCode::FORBIDDEN.as_u16() =>
        {
            ReconcileError::Auth {
                command: format!("{} {}/{}", verb, kind, name),
                stderr: response.message,
            }
        }
        other => ReconcileError::KubeError(other),
    }
}

fn to_object(descriptor: &ResourceDescriptor) -> Result<DynamicObject> {
    Ok(serde_json::from_value(descriptor.to_manifest())?)
}

#[async_trait]
impl ClusterClient for ApiClusterClient {
    #[instrument(skip(self))]
    async fn get(&self, kind: ResourceKind, namespace: &str, name: &str) -> Result<Option<Value>> {
        let object = self
            .api(kind, namespace)
            .get_opt(name)
            .await
            .map_err(|e| classify_error(e, "get", kind.as_str(), name))?;

        match object {
            Some(object) => Ok(Some(serde_json::to_value(object)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, descriptor), fields(kind = %descriptor.kind(), name = %descriptor.name()))]
    async fn create(&self, descriptor: &ResourceDescriptor) -> Result<Value> {
        let object = to_object(descriptor)?;
        let created = self
            .api(descriptor.kind(), descriptor.namespace())
            .create(&PostParams::default(), &object)
            .await
            .map_err(|e| classify_error(e, "create", descriptor.kind().as_str(), descriptor.name()))?;
        Ok(serde_json::to_value(created)?)
    }

    #[instrument(skip(self, descriptor), fields(kind = %descriptor.kind(), name = %descriptor.name()))]
    async fn replace(&self, descriptor: &ResourceDescriptor) -> Result<Value> {
        let object = to_object(descriptor)?;
        let replaced = self
            .api(descriptor.kind(), descriptor.namespace())
            .replace(descriptor.name(), &PostParams::default(), &object)
            .await
            .map_err(|e| classify_error(e, "replace", descriptor.kind().as_str(), descriptor.name()))?;
        Ok(serde_json::to_value(replaced)?)
    }

    #[instrument(skip(self))]
    async fn delete(&self, kind: ResourceKind, namespace: &str, name: &str) -> Result<()> {
        self.api(kind, namespace)
            .delete(name, &DeleteParams::default())
            .await
            .map_err(|e| classify_error(e, "delete", kind.as_str(), name))?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn namespace_exists(&self, namespace: &str) -> Result<bool> {
        let namespaces: Api<Namespace> = Api::all(self.client.clone());
        let existing = namespaces
            .get_opt(namespace)
            .await
            .map_err(|e| classify_error(e, "get", "Namespace", namespace))?;
        Ok(existing.is_some())
    }

    #[instrument(skip(self))]
    async fn create_namespace(&self, namespace: &str) -> Result<()> {
        let namespaces: Api<Namespace> = Api::all(self.client.clone());
        let ns = Namespace {
            metadata: ObjectMeta {
                name: Some(namespace.to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        namespaces
            .create(&PostParams::default(), &ns)
            .await
            .map_err(|e| classify_error(e, "create", "Namespace", namespace))?;
        debug!("Namespace {} created", namespace);
        Ok(())
    }
}
