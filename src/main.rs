//! `servedir`: HTTPS static file server binary entry point.
//!
//! Startup sequence:
//! 1. Parse CLI flags; load the TOML config file when one is given.
//! 2. Initialise tracing.
//! 3. Validate the merged configuration (certificate, key, and root must
//!    exist before anything binds).
//! 4. Bind the listener and build the TLS acceptor.
//! 5. Accept connections until SIGINT/SIGTERM, then drain and exit.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use servedir::config::{loader, validation, ConfigError, ServerConfig};
use servedir::error::StartupError;
use servedir::http::HttpServer;
use servedir::lifecycle::{signals, Shutdown};
use servedir::net::listener::Listener;
use servedir::net::tls;

#[derive(Parser, Debug)]
#[command(name = "servedir", about = "Minimal HTTPS static file server", version)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address, e.g. 0.0.0.0:8080.
    #[arg(long)]
    bind: Option<String>,

    /// Path to the PEM certificate chain.
    #[arg(long)]
    cert: Option<PathBuf>,

    /// Path to the PEM private key.
    #[arg(long)]
    key: Option<PathBuf>,

    /// Directory to serve.
    #[arg(long)]
    root: Option<PathBuf>,
}

impl Cli {
    /// Load the config file (or defaults) and fold the flag overrides in.
    fn resolve_config(&self) -> Result<ServerConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => loader::load_config(path)?,
            None => ServerConfig::default(),
        };
        if let Some(bind) = &self.bind {
            config.listener.bind_address = bind.clone();
        }
        if let Some(cert) = &self.cert {
            config.tls.cert_path = cert.clone();
        }
        if let Some(key) = &self.key {
            config.tls.key_path = key.clone();
        }
        if let Some(root) = &self.root {
            config.content.root_dir = root.clone();
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "servedir=info".into()),
        )
        // stdout carries only the serving line; diagnostics go to stderr.
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), StartupError> {
    let config = cli.resolve_config()?;

    if let Err(errors) = validation::validate_config(&config) {
        return Err(validation::into_startup_error(errors));
    }

    tracing::info!(
        bind = %config.listener.bind_address,
        root = %config.content.root_dir.display(),
        "configuration loaded"
    );

    let listener = Listener::bind(&config.listener, &config.limits).await?;
    let acceptor = tls::build_acceptor(&config.tls.cert_path, &config.tls.key_path)?;

    let addr = listener.local_addr().map_err(StartupError::BindFailure)?;
    println!("Serving HTTPS on https://{}:{}", display_host(&addr), addr.port());

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_shutdown_signal().await;
        shutdown.trigger();
    });

    HttpServer::new(config).run(listener, acceptor, receiver).await
}

/// Render the host part of the serving URL. An unspecified bind address
/// still has to produce something a browser can open.
fn display_host(addr: &SocketAddr) -> String {
    if addr.ip().is_unspecified() {
        "localhost".to_string()
    } else {
        addr.ip().to_string()
    }
}
