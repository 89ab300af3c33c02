//! Configuration validation.
//!
//! Semantic checks on an assembled [`ServerConfig`], run after the file and
//! any CLI overrides have been merged and before anything binds a socket.
//! Collects every violation instead of stopping at the first, so the
//! operator sees the whole picture in one diagnostic.
//!
//! Only filesystem metadata is consulted here; certificate contents are
//! parsed later, when the TLS context is built.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::config::loader::ConfigError;
use crate::config::schema::ServerConfig;
use crate::error::StartupError;

/// A single semantic problem with the configuration.
#[derive(Debug)]
pub enum ValidationError {
    /// The certificate path does not name an existing regular file.
    MissingCertificate(PathBuf),
    /// The private key path does not name an existing regular file.
    MissingPrivateKey(PathBuf),
    /// The served root is missing or not a directory.
    RootNotADirectory(PathBuf),
    /// The bind address does not parse as `host:port`.
    InvalidBindAddress(String),
    /// The connection limit is zero, which would never accept anything.
    ZeroConnectionLimit,
    /// The header buffer bound is too small to hold a plausible request.
    HeaderBoundTooSmall(usize),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MissingCertificate(path) => {
                write!(f, "certificate file not found: {}", path.display())
            }
            ValidationError::MissingPrivateKey(path) => {
                write!(f, "private key file not found: {}", path.display())
            }
            ValidationError::RootNotADirectory(path) => {
                write!(f, "root is not a directory: {}", path.display())
            }
            ValidationError::InvalidBindAddress(addr) => {
                write!(f, "invalid bind address: {}", addr)
            }
            ValidationError::ZeroConnectionLimit => {
                write!(f, "max_connections must be at least 1")
            }
            ValidationError::HeaderBoundTooSmall(bytes) => {
                write!(f, "max_header_bytes must be at least 8192, got {}", bytes)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a fully assembled configuration.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !is_regular_file(&config.tls.cert_path) {
        errors.push(ValidationError::MissingCertificate(config.tls.cert_path.clone()));
    }
    if !is_regular_file(&config.tls.key_path) {
        errors.push(ValidationError::MissingPrivateKey(config.tls.key_path.clone()));
    }
    if !config.content.root_dir.is_dir() {
        errors.push(ValidationError::RootNotADirectory(config.content.root_dir.clone()));
    }
    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.limits.max_connections == 0 {
        errors.push(ValidationError::ZeroConnectionLimit);
    }
    // The HTTP/1.1 connection driver needs room for its initial read
    // buffer; anything below 8 KiB cannot hold a plausible request head
    // either.
    if config.limits.max_header_bytes < 8192 {
        errors.push(ValidationError::HeaderBoundTooSmall(config.limits.max_header_bytes));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Convert validation failures into the startup error taxonomy.
///
/// Missing credentials get their dedicated variant so the operator-facing
/// message names the paths the way the serving loop never will; everything
/// else is reported as a configuration error.
pub fn into_startup_error(errors: Vec<ValidationError>) -> StartupError {
    let missing: Vec<PathBuf> = errors
        .iter()
        .filter_map(|e| match e {
            ValidationError::MissingCertificate(path)
            | ValidationError::MissingPrivateKey(path) => Some(path.clone()),
            _ => None,
        })
        .collect();

    if !missing.is_empty() {
        StartupError::MissingCredential { paths: missing }
    } else {
        StartupError::Config(ConfigError::Validation(errors))
    }
}

fn is_regular_file(path: &Path) -> bool {
    std::fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}
