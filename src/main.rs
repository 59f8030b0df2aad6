// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error, info};

use oso_reconciler::config::{Config, LogFormat, NamespaceStyle, Transport};
use oso_reconciler::constants::exit_codes;
use oso_reconciler::error::{ReconcileError, Result};
use oso_reconciler::kubernetes::create_cluster_client;
use oso_reconciler::manifest::{desired_states, load_documents};
use oso_reconciler::reconcilers::{reconcile_all, DesiredState, ReconcileOptions};
use oso_reconciler::report::Report;
use oso_reconciler::types::{ResourceKind, ResourceSpec, SecretSpec};

/// Idempotently reconcile OpenShift resources
#[derive(Parser, Debug)]
#[command(name = "oso-reconciler", version, about)]
struct Cli {
    /// Cluster transport [env: OSO_TRANSPORT]
    #[arg(long, global = true, value_enum)]
    transport: Option<Transport>,

    /// Binary used by the cli transport [env: OSO_OC_BINARY]
    #[arg(long, global = true)]
    oc_binary: Option<String>,

    /// Kubeconfig context to use [env: OSO_CONTEXT]
    #[arg(long, global = true)]
    context: Option<String>,

    /// Create namespaces as projects or plain namespaces [env: OSO_NAMESPACE_STYLE]
    #[arg(long, global = true, value_enum)]
    namespace_style: Option<NamespaceStyle>,

    /// Log output format [env: OSO_LOG_FORMAT]
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Reconcile the resources described in a YAML file
    Apply {
        /// Resource file, or '-' for stdin
        #[arg(short = 'f', long = "file")]
        file: PathBuf,

        /// Namespace for every resource, overriding the file
        #[arg(short, long)]
        namespace: Option<String>,

        /// Report what would change without changing anything
        #[arg(long)]
        dry_run: bool,

        /// Replace existing resources with the desired definition
        #[arg(long, conflicts_with = "recreate")]
        replace: bool,

        /// Delete and recreate existing resources
        #[arg(long)]
        recreate: bool,
    },
    /// Ensure a resource is absent
    Delete {
        /// Resource kind, e.g. dc, pvc, route, service, secret
        kind: String,

        name: String,

        #[arg(short, long)]
        namespace: String,

        #[arg(long)]
        dry_run: bool,
    },
    /// Create or replace an opaque secret from KEY=VALUE literals
    Secret {
        name: String,

        #[arg(short, long)]
        namespace: String,

        /// Secret entries as KEY=VALUE
        #[arg(required = true)]
        literals: Vec<String>,

        #[arg(long)]
        dry_run: bool,
    },
}

impl Cli {
    fn apply_overrides(&self, mut config: Config) -> Config {
        if let Some(transport) = self.transport {
            config.transport = transport;
        }
        if let Some(oc_binary) = &self.oc_binary {
            config.oc_binary = oc_binary.clone();
        }
        if let Some(context) = &self.context {
            config.context = Some(context.clone());
        }
        if let Some(style) = self.namespace_style {
            config.namespace_style = style;
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        config
    }

    /// Turn the subcommand into desired states. No cluster access happens here.
    fn plan(&self) -> Result<(Vec<DesiredState>, ReconcileOptions)> {
        match &self.command {
            Command::Apply {
                file,
                namespace,
                dry_run,
                replace,
                recreate,
            } => {
                let documents = load_documents(file)?;
                let desired = desired_states(&documents, namespace.as_deref())?;
                Ok((
                    desired,
                    ReconcileOptions {
                        replace: *replace,
                        recreate: *recreate,
                        dry_run: *dry_run,
                    },
                ))
            }
            Command::Delete {
                kind,
                name,
                namespace,
                dry_run,
            } => {
                let kind: ResourceKind = kind.parse()?;
                Ok((
                    vec![DesiredState::absent(kind, namespace, name)?],
                    ReconcileOptions {
                        dry_run: *dry_run,
                        ..Default::default()
                    },
                ))
            }
            Command::Secret {
                name,
                namespace,
                literals,
                dry_run,
            } => {
                let spec = SecretSpec::from_literals(name, literals)?;
                Ok((
                    vec![DesiredState::Present(spec.build(namespace)?)],
                    ReconcileOptions {
                        replace: true,
                        dry_run: *dry_run,
                        ..Default::default()
                    },
                ))
            }
        }
    }
}

fn init_logging(format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // stdout carries the report, so logs go to stderr
    match format {
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .json()
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact()
                .init();
        }
    }
}

async fn run(cli: &Cli, config: &Config, report: &mut Report) -> Result<()> {
    let (desired, options) = cli.plan()?;
    debug!("Planned {} resource(s) with {:?}", desired.len(), options);

    let client = create_cluster_client(config).await?;
    reconcile_all(client.as_ref(), &desired, options, report).await
}

fn print_report(report: &Report) {
    match report.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => error!("Failed to serialize report: {}", e),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => cli.apply_overrides(config),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::from(exit_codes::VALIDATION_ERROR as u8);
        }
    };
    init_logging(config.log_format);
    info!("Using {:?} transport", config.transport);

    let mut report = Report::new();
    match run(&cli, &config, &mut report).await {
        Ok(()) => {
            print_report(&report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            report.error = Some(e.to_string());
            print_report(&report);
            ExitCode::from(exit_code_of(&e))
        }
    }
}

fn exit_code_of(err: &ReconcileError) -> u8 {
    u8::try_from(err.exit_code()).unwrap_or(exit_codes::ERROR as u8)
}
