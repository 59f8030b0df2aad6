// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Namespace management utilities

use super::client::ClusterClient;
use crate::error::Result;
use crate::types::validate_name;
use tracing::{debug, info, instrument};

/// Ensure a namespace exists in the cluster, create if it doesn't.
///
/// Returns whether the namespace was already there. A creation that loses a
/// race against another writer ("already exists") counts as pre-existing.
/// In dry-run mode nothing is created.
#[instrument(skip(client))]
pub async fn ensure_namespace_exists<C: ClusterClient + ?Sized>(
    client: &C,
    namespace: &str,
    dry_run: bool,
) -> Result<bool> {
    validate_name("Namespace", namespace)?;

    if client.namespace_exists(namespace).await? {
        debug!("Namespace {} already exists", namespace);
        return Ok(true);
    }

    if dry_run {
        info!("Namespace {} does not exist and would be created", namespace);
        return Ok(false);
    }

    info!("Creating namespace {}", namespace);
    match client.create_namespace(namespace).await {
        Ok(()) => {
            info!("Namespace {} created successfully", namespace);
            Ok(false)
        }
        Err(e) if e.is_already_exists() => {
            debug!("Namespace {} was created concurrently", namespace);
            Ok(true)
        }
        Err(e) => Err(e),
    }
}
