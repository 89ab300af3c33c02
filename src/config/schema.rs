//! Configuration schema definitions.
//!
//! The complete configuration for the server. All types derive Serde traits
//! for deserialization from a TOML file, and every field has a default so
//! the server starts with no configuration at all.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the static file server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// TLS certificate and key locations.
    pub tls: TlsConfig,

    /// Served content configuration.
    pub content: ContentConfig,

    /// Connection and request limits.
    pub limits: LimitsConfig,

    /// Shutdown behavior.
    pub shutdown: ShutdownConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TlsConfig {
    /// Path to the certificate chain file (PEM).
    pub cert_path: PathBuf,

    /// Path to the private key file (PEM, unencrypted).
    pub key_path: PathBuf,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            cert_path: PathBuf::from("certs/cert.pem"),
            key_path: PathBuf::from("certs/key.pem"),
        }
    }
}

/// Served content configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Directory whose contents are served.
    pub root_dir: PathBuf,

    /// File served in place of a directory listing when present.
    pub index_file: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            index_file: "index.html".to_string(),
        }
    }
}

/// Connection and request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum concurrent connections (backpressure).
    pub max_connections: usize,

    /// Maximum bytes buffered while parsing a request head. Connections
    /// exceeding it are terminated.
    pub max_header_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_connections: 1024,
            max_header_bytes: 64 * 1024,
        }
    }
}

/// Shutdown behavior.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ShutdownConfig {
    /// How long in-flight connections may keep running after a shutdown
    /// signal before being abandoned.
    pub drain_timeout_secs: u64,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            drain_timeout_secs: 10,
        }
    }
}
