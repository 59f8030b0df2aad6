// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Default cluster CLI binary
pub const DEFAULT_OC_BINARY: &str = "oc";

/// Default requested storage for a persistent volume claim
pub const DEFAULT_REQUESTED_STORAGE: &str = "1Gi";

/// Patterns matched against CLI stderr to classify failures. Only the
/// server's status reasons count; client-side errors such as an unknown
/// context also say "not found".
pub mod stderr {
    pub const NOT_FOUND: &[&str] = &["Error from server (NotFound)"];
    pub const ALREADY_EXISTS: &[&str] = &["Error from server (AlreadyExists)"];
    pub const UNAUTHORIZED: &[&str] = &[
        "Unauthorized",
        "Forbidden",
        "forbidden:",
        "must be logged in",
    ];
}

/// Process exit codes of the command line driver
pub mod exit_codes {
    pub const ERROR: i32 = 1;
    pub const VALIDATION_ERROR: i32 = 2;
    pub const AUTH_ERROR: i32 = 3;
    pub const CLUSTER_ERROR: i32 = 4;
}
