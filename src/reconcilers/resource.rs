// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Resource reconciler - compares desired and live state and applies the
//! minimal action.

use crate::error::{ReconcileError, Result};
use crate::kubernetes::ClusterClient;
use crate::types::{validate_name, ResourceDescriptor, ResourceKind};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument};

/// What the caller wants to be true for one resource
#[derive(Clone, Debug, PartialEq)]
pub enum DesiredState {
    Present(ResourceDescriptor),
    Absent {
        kind: ResourceKind,
        namespace: String,
        name: String,
    },
}

impl DesiredState {
    /// Desired absence of a resource. Names are checked here since no
    /// builder runs for a delete.
    pub fn absent(kind: ResourceKind, namespace: &str, name: &str) -> Result<Self> {
        validate_name("Namespace", namespace)?;
        validate_name(kind.as_str(), name)?;
        Ok(DesiredState::Absent {
            kind,
            namespace: namespace.to_string(),
            name: name.to_string(),
        })
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            DesiredState::Present(d) => d.kind(),
            DesiredState::Absent { kind, .. } => *kind,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            DesiredState::Present(d) => d.name(),
            DesiredState::Absent { name, .. } => name,
        }
    }

    pub fn namespace(&self) -> &str {
        match self {
            DesiredState::Present(d) => d.namespace(),
            DesiredState::Absent { namespace, .. } => namespace,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// Overwrite an existing resource with the desired one
    pub replace: bool,
    /// Delete and re-create an existing resource; wins over `replace`
    pub recreate: bool,
    /// Decide, but do not mutate anything
    pub dry_run: bool,
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileAction {
    NoOp,
    Create,
    Replace,
    Recreate,
    Delete,
}

impl ReconcileAction {
    pub fn is_change(&self) -> bool {
        *self != ReconcileAction::NoOp
    }
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ReconcileDecision {
    pub action: ReconcileAction,
    pub description: String,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ReconcileResult {
    pub changed: bool,
    pub decision: ReconcileDecision,
    /// Snapshot of the resource after the pass; `None` when it is absent
    pub resulting_state: Option<Value>,
}

/// Decide the action for one resource. Pure: dry-run and real runs share it.
pub fn decide(
    desired: &DesiredState,
    current: Option<&Value>,
    options: &ReconcileOptions,
) -> ReconcileDecision {
    let kind = desired.kind();
    let name = desired.name();

    let action = match (desired, current) {
        (DesiredState::Present(_), None) => ReconcileAction::Create,
        (DesiredState::Present(_), Some(_)) if options.recreate => ReconcileAction::Recreate,
        (DesiredState::Present(_), Some(_)) if options.replace => ReconcileAction::Replace,
        (DesiredState::Present(_), Some(_)) => ReconcileAction::NoOp,
        (DesiredState::Absent { .. }, Some(_)) => ReconcileAction::Delete,
        (DesiredState::Absent { .. }, None) => ReconcileAction::NoOp,
    };

    let description = match action {
        ReconcileAction::Create => format!("Create {} {}", kind.noun(), name),
        ReconcileAction::Replace => format!("Replace {} {}", kind.noun(), name),
        ReconcileAction::Recreate => format!("Recreate {} {}", kind.noun(), name),
        ReconcileAction::Delete => format!("Delete {} {}", kind.noun(), name),
        ReconcileAction::NoOp if current.is_some() => {
            format!("{} {} is up to date", kind.noun(), name)
        }
        ReconcileAction::NoOp => format!("{} {} is already absent", kind.noun(), name),
    };

    ReconcileDecision {
        action,
        description,
    }
}

pub struct Reconciler<'a, C: ClusterClient + ?Sized> {
    client: &'a C,
    options: ReconcileOptions,
}

impl<'a, C: ClusterClient + ?Sized> Reconciler<'a, C> {
    pub fn new(client: &'a C, options: ReconcileOptions) -> Self {
        Self { client, options }
    }

    pub fn options(&self) -> &ReconcileOptions {
        &self.options
    }

    /// Run one reconciliation pass for a resource.
    ///
    /// An error aborts the pass; steps already applied (e.g. the delete half
    /// of a recreate) stay applied.
    #[instrument(
        skip(self, desired),
        fields(
            resource = %format!("{}/{}/{}", desired.namespace(), desired.kind(), desired.name()),
            dry_run = self.options.dry_run
        )
    )]
    pub async fn reconcile(&self, desired: &DesiredState) -> Result<ReconcileResult> {
        let kind = desired.kind();
        let namespace = desired.namespace();
        let name = desired.name();

        let current = self.client.get(kind, namespace, name).await?;
        let decision = decide(desired, current.as_ref(), &self.options);
        let changed = decision.action.is_change();

        if self.options.dry_run {
            info!("Check mode: {}", decision.description);
            let resulting_state = match desired {
                DesiredState::Present(_) => current,
                DesiredState::Absent { .. } => None,
            };
            return Ok(ReconcileResult {
                changed,
                decision,
                resulting_state,
            });
        }

        if changed {
            info!("{}", decision.description);
        } else {
            debug!("{}", decision.description);
        }

        match (desired, decision.action) {
            (_, ReconcileAction::NoOp) => {}
            (DesiredState::Present(descriptor), ReconcileAction::Create) => {
                self.client.create(descriptor).await?;
            }
            (DesiredState::Present(descriptor), ReconcileAction::Replace) => {
                // No resourceVersion precondition: a write between the get
                // above and this replace is overwritten.
                let live = current.as_ref().ok_or_else(|| ReconcileError::NotFound {
                    kind: kind.to_string(),
                    name: name.to_string(),
                    command: format!("replace {}/{}", kind, name),
                    stderr: String::new(),
                })?;
                let replacement = kind.prepare_replace(descriptor, live)?;
                self.client.replace(&replacement).await?;
            }
            (DesiredState::Present(descriptor), ReconcileAction::Recreate) => {
                self.client.delete(kind, namespace, name).await?;
                self.client.create(descriptor).await?;
            }
            (DesiredState::Absent { .. }, ReconcileAction::Delete) => {
                self.client.delete(kind, namespace, name).await?;
            }
            (_, action) => {
                return Err(ReconcileError::Validation(format!(
                    "Cannot apply {:?} to {} {}",
                    action, kind, name
                )));
            }
        }

        let resulting_state = match desired {
            DesiredState::Present(_) => self.client.get(kind, namespace, name).await?,
            DesiredState::Absent { .. } => None,
        };

        Ok(ReconcileResult {
            changed,
            decision,
            resulting_state,
        })
    }
}
