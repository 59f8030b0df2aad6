// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster client that shells out to the `oc` command line client.
//!
//! Every call is described by a [`CliRequest`], an argument vector plus an
//! optional document for stdin. Nothing is ever passed through a shell, so
//! names and manifests need no quoting.

use super::client::ClusterClient;
use crate::config::NamespaceStyle;
use crate::constants::stderr;
use crate::error::{ReconcileError, Result};
use crate::types::{ResourceDescriptor, ResourceKind};
use async_trait::async_trait;
use serde_json::Value;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, instrument, trace};

/// A single invocation of the command line client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliRequest {
    pub args: Vec<String>,
    pub stdin: Option<String>,
}

impl CliRequest {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            stdin: None,
        }
    }

    pub fn with_stdin(mut self, stdin: String) -> Self {
        self.stdin = Some(stdin);
        self
    }

    /// Human readable command line, for logs and error messages only
    pub fn command_line(&self, binary: &str) -> String {
        std::iter::once(binary)
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Exit code and captured output of a finished command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs command line requests. Split out so tests can script the results.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, binary: &str, request: &CliRequest) -> Result<CommandOutput>;
}

/// Runs requests as local child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, binary: &str, request: &CliRequest) -> Result<CommandOutput> {
        let spawn_failure = |e: std::io::Error| ReconcileError::Transport {
            command: request.command_line(binary),
            stdout: String::new(),
            stderr: e.to_string(),
            exit_code: -1,
        };

        let mut cmd = Command::new(binary);
        cmd.args(&request.args)
            .stdin(if request.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(spawn_failure)?;

        if let Some(input) = &request.stdin {
            if let Some(mut stdin) = child.stdin.take() {
                if let Err(e) = stdin.write_all(input.as_bytes()).await {
                    drop(stdin);
                    if let Err(kill_err) = child.kill().await {
                        debug!("Failed to kill {}: {}", binary, kill_err);
                    }
                    return Err(e.into());
                }
            }
        }

        let output = child.wait_with_output().await?;

        Ok(CommandOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

pub struct CliClusterClient<R: CommandRunner> {
    runner: R,
    binary: String,
    context: Option<String>,
    namespace_style: NamespaceStyle,
}

impl<R: CommandRunner> CliClusterClient<R> {
    pub fn new(
        runner: R,
        binary: &str,
        context: Option<String>,
        namespace_style: NamespaceStyle,
    ) -> Self {
        Self {
            runner,
            binary: binary.to_string(),
            context,
            namespace_style,
        }
    }

    /// Run a request; a non-zero exit status becomes a classified error
    async fn call(&self, mut request: CliRequest, subject: (&str, &str)) -> Result<String> {
        if let Some(context) = &self.context {
            request.args.push(format!("--context={}", context));
        }

        let command = request.command_line(&self.binary);
        debug!("exec: {}", command);

        let output = self.runner.run(&self.binary, &request).await?;
        trace!(
            exit_code = output.exit_code,
            stdout = %output.stdout,
            stderr = %output.stderr,
            "Command completed"
        );

        if output.success() {
            Ok(output.stdout)
        } else {
            Err(classify_failure(command, subject, output))
        }
    }

    fn namespace_resource(&self) -> &'static str {
        match self.namespace_style {
            NamespaceStyle::Project => "project",
            NamespaceStyle::Namespace => "namespace",
        }
    }
}

/// Map a failed command onto the error taxonomy by inspecting stderr
fn classify_failure(command: String, subject: (&str, &str), output: CommandOutput) -> ReconcileError {
    let matches_any = |patterns: &[&str]| patterns.iter().any(|p| output.stderr.contains(p));
    let unauthorized = matches_any(stderr::UNAUTHORIZED);
    let not_found = matches_any(stderr::NOT_FOUND);
    let already_exists = matches_any(stderr::ALREADY_EXISTS);
    let (kind, name) = subject;

    if unauthorized {
        ReconcileError::Auth {
            command,
            stderr: output.stderr,
        }
    } else if not_found {
        ReconcileError::NotFound {
            kind: kind.to_string(),
            name: name.to_string(),
            command,
            stderr: output.stderr,
        }
    } else if already_exists {
        ReconcileError::AlreadyExists {
            kind: kind.to_string(),
            name: name.to_string(),
            command,
            stderr: output.stderr,
        }
    } else {
        ReconcileError::Transport {
            command,
            stdout: output.stdout,
            stderr: output.stderr,
            exit_code: output.exit_code,
        }
    }
}

#[async_trait]
impl<R: CommandRunner> ClusterClient for CliClusterClient<R> {
    #[instrument(skip(self))]
    async fn get(&self, kind: ResourceKind, namespace: &str, name: &str) -> Result<Option<Value>> {
        let target = format!("{}/{}", kind.cli_name(), name);
        let request = CliRequest::new(["get", target.as_str(), "-n", namespace, "-o", "json"]);

        match self.call(request, (kind.as_str(), name)).await {
            Ok(stdout) => Ok(Some(serde_json::from_str(&stdout)?)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self, descriptor), fields(kind = %descriptor.kind(), name = %descriptor.name()))]
    async fn create(&self, descriptor: &ResourceDescriptor) -> Result<Value> {
        let manifest = serde_json::to_string_pretty(&descriptor.to_manifest())?;
        debug!("Create from template:\n{}", manifest);
        let request = CliRequest::new(["create", "-f", "-", "-n", descriptor.namespace(), "-o", "json"])
            .with_stdin(manifest);

        let stdout = self
            .call(request, (descriptor.kind().as_str(), descriptor.name()))
            .await?;
        Ok(serde_json::from_str(&stdout)?)
    }

    #[instrument(skip(self, descriptor), fields(kind = %descriptor.kind(), name = %descriptor.name()))]
    async fn replace(&self, descriptor: &ResourceDescriptor) -> Result<Value> {
        let manifest = serde_json::to_string_pretty(&descriptor.to_manifest())?;
        debug!("Replace from template:\n{}", manifest);
        let request =
            CliRequest::new(["replace", "-f", "-", "-n", descriptor.namespace(), "-o", "json"])
                .with_stdin(manifest);

        let stdout = self
            .call(request, (descriptor.kind().as_str(), descriptor.name()))
            .await?;
        Ok(serde_json::from_str(&stdout)?)
    }

    #[instrument(skip(self))]
    async fn delete(&self, kind: ResourceKind, namespace: &str, name: &str) -> Result<()> {
        let target = format!("{}/{}", kind.cli_name(), name);
        let request = CliRequest::new(["delete", target.as_str(), "-n", namespace]);

        self.call(request, (kind.as_str(), name)).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn namespace_exists(&self, namespace: &str) -> Result<bool> {
        let target = format!("{}/{}", self.namespace_resource(), namespace);
        let request = CliRequest::new(["get", target.as_str(), "-o", "name"]);

        match self.call(request, (self.namespace_resource(), namespace)).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            // Projects the user cannot see answer Forbidden whether or not
            // they exist; new-project settles it.
            Err(ReconcileError::Auth { stderr, .. })
                if self.namespace_style == NamespaceStyle::Project
                    && stderr.contains("Error from server (Forbidden)") =>
            {
                debug!("Project {} is not visible: {}", namespace, stderr.trim());
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self))]
    async fn create_namespace(&self, namespace: &str) -> Result<()> {
        let request = match self.namespace_style {
            NamespaceStyle::Project => {
                CliRequest::new(["new-project", namespace, "--skip-config-write"])
            }
            NamespaceStyle::Namespace => CliRequest::new(["create", "namespace", namespace]),
        };

        self.call(request, (self.namespace_resource(), namespace)).await?;
        Ok(())
    }

    fn namespace_noun(&self) -> &'static str {
        self.namespace_resource()
    }
}
