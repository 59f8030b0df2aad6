// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster access: the client abstraction, its CLI and API transports, and
//! namespace management.

pub mod api;
pub mod cli;
pub mod client;
pub mod namespaces;

pub use api::ApiClusterClient;
pub use cli::{CliClusterClient, CliRequest, CommandOutput, CommandRunner, ProcessRunner};
pub use client::{create_cluster_client, ClusterClient};
pub use namespaces::ensure_namespace_exists;
