//! TLS termination setup.
//!
//! Loads the PEM certificate chain and private key from disk and builds the
//! `rustls::ServerConfig` every accepted connection is wrapped with. The
//! files themselves were checked for existence during config validation;
//! this module is where their contents are actually parsed.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use tokio_rustls::TlsAcceptor;

use crate::error::StartupError;

/// Offered protocol versions. TLS 1.2 is the floor; 1.3 is preferred when
/// the client supports it.
static PROTOCOL_VERSIONS: &[&rustls::SupportedProtocolVersion] =
    &[&rustls::version::TLS13, &rustls::version::TLS12];

/// Build a [`rustls::ServerConfig`] from PEM files on disk.
pub fn build_server_config(
    cert_path: &Path,
    key_path: &Path,
) -> Result<Arc<rustls::ServerConfig>, StartupError> {
    let cert_file = File::open(cert_path).map_err(|e| {
        StartupError::TlsConfig(format!("cannot open {}: {}", cert_path.display(), e))
    })?;
    let certs = rustls_pemfile::certs(&mut BufReader::new(cert_file))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            StartupError::TlsConfig(format!(
                "failed to parse certificate chain {}: {}",
                cert_path.display(),
                e
            ))
        })?;
    if certs.is_empty() {
        return Err(StartupError::TlsConfig(format!(
            "no certificates found in {}",
            cert_path.display()
        )));
    }

    let key_file = File::open(key_path).map_err(|e| {
        StartupError::TlsConfig(format!("cannot open {}: {}", key_path.display(), e))
    })?;
    let key = rustls_pemfile::private_key(&mut BufReader::new(key_file))
        .map_err(|e| {
            StartupError::TlsConfig(format!(
                "failed to read private key {}: {}",
                key_path.display(),
                e
            ))
        })?
        .ok_or_else(|| {
            StartupError::TlsConfig(format!("no private key found in {}", key_path.display()))
        })?;

    let config = rustls::ServerConfig::builder_with_provider(Arc::new(
        rustls::crypto::ring::default_provider(),
    ))
    .with_protocol_versions(PROTOCOL_VERSIONS)
    .map_err(|e| StartupError::TlsConfig(e.to_string()))?
    .with_no_client_auth()
    .with_single_cert(certs, key)
    .map_err(|e| StartupError::TlsConfig(e.to_string()))?;

    Ok(Arc::new(config))
}

/// Build the acceptor that performs the handshake on accepted sockets.
pub fn build_acceptor(cert_path: &Path, key_path: &Path) -> Result<TlsAcceptor, StartupError> {
    Ok(TlsAcceptor::from(build_server_config(cert_path, key_path)?))
}
