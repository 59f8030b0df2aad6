// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{anyhow, Result};
use clap::ValueEnum;
use std::env;

use crate::constants::DEFAULT_OC_BINARY;

/// How the tool talks to the cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Transport {
    /// Shell out to the `oc` command line client
    Cli,
    /// Talk to the API server directly
    Api,
}

/// Whether namespaces are OpenShift projects or plain Kubernetes namespaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NamespaceStyle {
    Project,
    Namespace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Runtime configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub transport: Transport,
    /// Binary used by the CLI transport
    pub oc_binary: String,
    /// Optional kubeconfig context passed to every CLI call
    pub context: Option<String>,
    pub namespace_style: NamespaceStyle,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            transport: Transport::Cli,
            oc_binary: DEFAULT_OC_BINARY.to_string(),
            context: None,
            namespace_style: NamespaceStyle::Project,
            log_format: LogFormat::Text,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let transport = match lookup("OSO_TRANSPORT") {
            Some(v) => parse_enum("OSO_TRANSPORT", &v)?,
            None => defaults.transport,
        };
        let namespace_style = match lookup("OSO_NAMESPACE_STYLE") {
            Some(v) => parse_enum("OSO_NAMESPACE_STYLE", &v)?,
            None => defaults.namespace_style,
        };
        let log_format = match lookup("OSO_LOG_FORMAT") {
            Some(v) => parse_enum("OSO_LOG_FORMAT", &v)?,
            None => defaults.log_format,
        };
        let oc_binary = lookup("OSO_OC_BINARY")
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.oc_binary);
        let context = lookup("OSO_CONTEXT").filter(|v| !v.is_empty());

        Ok(Config {
            transport,
            oc_binary,
            context,
            namespace_style,
            log_format,
        })
    }
}

fn parse_enum<T: ValueEnum>(key: &str, value: &str) -> Result<T> {
    T::from_str(value, true).map_err(|_| anyhow!("Invalid value '{}' for {}", value, key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.transport, Transport::Cli);
        assert_eq!(config.oc_binary, "oc");
        assert_eq!(config.context, None);
        assert_eq!(config.namespace_style, NamespaceStyle::Project);
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_environment_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("OSO_TRANSPORT", "api"),
            ("OSO_OC_BINARY", "/usr/local/bin/kubectl"),
            ("OSO_CONTEXT", "staging"),
            ("OSO_NAMESPACE_STYLE", "Namespace"),
            ("OSO_LOG_FORMAT", "json"),
        ]))
        .unwrap();

        assert_eq!(config.transport, Transport::Api);
        assert_eq!(config.oc_binary, "/usr/local/bin/kubectl");
        assert_eq!(config.context.as_deref(), Some("staging"));
        assert_eq!(config.namespace_style, NamespaceStyle::Namespace);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_transport_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("OSO_TRANSPORT", "carrier-pigeon")]))
            .unwrap_err();

        assert!(err.to_string().contains("OSO_TRANSPORT"));
    }

    #[test]
    fn test_empty_context_is_ignored() {
        let config = Config::from_lookup(lookup_from(&[("OSO_CONTEXT", "")])).unwrap();
        assert_eq!(config.context, None);
    }
}
