// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Reconciliation of desired resources against the cluster.

pub mod pipeline;
pub mod resource;

pub use pipeline::reconcile_all;
pub use resource::{
    decide, DesiredState, ReconcileAction, ReconcileDecision, ReconcileOptions, ReconcileResult,
    Reconciler,
};
