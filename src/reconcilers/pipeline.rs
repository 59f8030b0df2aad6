// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use super::resource::{DesiredState, ReconcileOptions, Reconciler};
use crate::error::Result;
use crate::kubernetes::{ensure_namespace_exists, ClusterClient};
use crate::report::Report;
use std::collections::HashSet;
use tracing::info;

/// Reconcile resources one after another, recording every outcome.
///
/// The namespace of each resource that should be present is ensured first,
/// once per namespace. The first error stops the run; the report keeps what
/// was applied up to that point.
pub async fn reconcile_all<C: ClusterClient + ?Sized>(
    client: &C,
    desired: &[DesiredState],
    options: ReconcileOptions,
    report: &mut Report,
) -> Result<()> {
    let reconciler = Reconciler::new(client, options);
    let mut ensured = HashSet::new();

    for state in desired {
        let namespace = state.namespace();
        if matches!(state, DesiredState::Present(_)) && ensured.insert(namespace.to_string()) {
            let existed = ensure_namespace_exists(client, namespace, options.dry_run).await?;
            report.record_namespace(client.namespace_noun(), namespace, existed);
        }

        let result = reconciler.reconcile(state).await?;
        report.record(state.kind(), namespace, state.name(), &result);
    }

    info!(
        "Reconciled {} resource(s), changed={}",
        desired.len(),
        report.changed
    );
    Ok(())
}
