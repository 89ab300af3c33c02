//! Startup error taxonomy.
//!
//! Everything here is fatal: `main` prints the error once to stderr and the
//! process exits non-zero before any request is served. Per-request failures
//! never reach this module; they are converted to HTTP responses at the
//! connection boundary.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::loader::ConfigError;

/// Errors that abort startup before the server accepts traffic.
#[derive(Debug, Error)]
pub enum StartupError {
    /// The TLS certificate or private key is not an existing regular file.
    #[error("cannot find {}", join_paths(.paths))]
    MissingCredential { paths: Vec<PathBuf> },

    /// Binding the TCP socket failed (address in use, permission denied, or
    /// an unparseable bind address).
    #[error("failed to bind listener: {0}")]
    BindFailure(#[source] std::io::Error),

    /// The certificate chain or private key could not be parsed, or rustls
    /// rejected the pair.
    #[error("invalid TLS configuration: {0}")]
    TlsConfig(String),

    /// The configuration file could not be loaded, or validation found
    /// problems other than missing credentials.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" and/or ")
}
