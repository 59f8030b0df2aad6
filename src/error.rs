// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::exit_codes;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("{kind} \"{name}\" not found (`{command}`: {stderr})")]
    NotFound {
        kind: String,
        name: String,
        command: String,
        stderr: String,
    },

    #[error("{kind} \"{name}\" already exists (`{command}`: {stderr})")]
    AlreadyExists {
        kind: String,
        name: String,
        command: String,
        stderr: String,
    },

    #[error("Command `{command}` failed with exit code {exit_code}: {stderr}")]
    Transport {
        command: String,
        stdout: String,
        stderr: String,
        exit_code: i32,
    },

    #[error("Not authorized to run `{command}`: {stderr}")]
    Auth { command: String, stderr: String },

    #[error("Invalid resource: {0}")]
    Validation(String),

    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Failed to (de)serialize resource: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to load resource file: {0}")]
    Manifest(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReconcileError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ReconcileError::NotFound { .. })
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, ReconcileError::AlreadyExists { .. })
    }

    /// Process exit code the command line driver reports for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            ReconcileError::Validation(_) | ReconcileError::Manifest(_) => {
                exit_codes::VALIDATION_ERROR
            }
            ReconcileError::Auth { .. } => exit_codes::AUTH_ERROR,
            ReconcileError::NotFound { .. }
            | ReconcileError::AlreadyExists { .. }
            | ReconcileError::Transport { .. }
            | ReconcileError::KubeError(_) => exit_codes::CLUSTER_ERROR,
            ReconcileError::Serialization(_) | ReconcileError::Io(_) => exit_codes::ERROR,
        }
    }
}

pub type Result<T> = std::result::Result<T, ReconcileError>;

#[cfg(test)]
mod tests {
    use super::*;
    use kube::core::ErrorResponse;

    fn api_error(code: u16) -> kube::Error {
        kube::Error::Api(ErrorResponse {
            status: "Failure".to_string(),
            message: "boom".to_string(),
            reason: "InternalError".to_string(),
            code,
        })
    }

    #[test]
    fn test_validation_errors_exit_with_two() {
        assert_eq!(ReconcileError::Validation("bad".to_string()).exit_code(), 2);

        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>("[").unwrap_err();
        assert_eq!(ReconcileError::Manifest(yaml_err).exit_code(), 2);
    }

    #[test]
    fn test_auth_errors_exit_with_three() {
        let err = ReconcileError::Auth {
            command: "oc get dc/web".to_string(),
            stderr: "Unauthorized".to_string(),
        };
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_cluster_errors_exit_with_four() {
        let errors = [
            ReconcileError::NotFound {
                kind: "Route".to_string(),
                name: "web".to_string(),
                command: "oc delete route/web -n shop".to_string(),
                stderr: String::new(),
            },
            ReconcileError::AlreadyExists {
                kind: "Route".to_string(),
                name: "web".to_string(),
                command: "oc create -f - -n shop".to_string(),
                stderr: String::new(),
            },
            ReconcileError::Transport {
                command: "oc get route/web".to_string(),
                stdout: String::new(),
                stderr: "i/o timeout".to_string(),
                exit_code: 1,
            },
            ReconcileError::KubeError(api_error(500)),
        ];

        for err in errors {
            assert_eq!(err.exit_code(), 4, "{err}");
        }
    }

    #[test]
    fn test_other_errors_exit_with_one() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(ReconcileError::Serialization(json_err).exit_code(), 1);

        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        assert_eq!(ReconcileError::Io(io_err).exit_code(), 1);
    }

    #[test]
    fn test_not_found_keeps_command_and_stderr() {
        let err = ReconcileError::NotFound {
            kind: "PersistentVolumeClaim".to_string(),
            name: "data".to_string(),
            command: "oc delete pvc/data -n shop".to_string(),
            stderr: "Error from server (NotFound): persistentvolumeclaims \"data\" not found"
                .to_string(),
        };

        let message = err.to_string();
        assert!(message.contains("oc delete pvc/data -n shop"));
        assert!(message.contains("Error from server (NotFound)"));
    }
}
