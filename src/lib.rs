//! Minimal TLS-terminating static file server.
//!
//! # Architecture Overview
//!
//! ```text
//!                   ┌───────────────────────────────────────────────┐
//!                   │                   servedir                     │
//!                   │                                                │
//!   TLS Client      │  ┌─────────┐   ┌─────────┐   ┌─────────────┐  │
//!   ────────────────┼─▶│   net   │──▶│  http   │──▶│   files     │  │
//!                   │  │listener │   │ server  │   │ resolve +   │  │
//!                   │  │ + tls   │   │ handler │   │ listing     │  │
//!                   │  └─────────┘   └─────────┘   └──────┬──────┘  │
//!                   │                                     │         │
//!   Response        │                                     ▼         │
//!   ◀───────────────┼──────────────────────────── root directory    │
//!                   │                                                │
//!                   │  ┌──────────────────────────────────────────┐ │
//!                   │  │          Cross-Cutting Concerns           │ │
//!                   │  │   ┌────────┐  ┌───────────┐  ┌────────┐  │ │
//!                   │  │   │ config │  │ lifecycle │  │ error  │  │ │
//!                   │  │   └────────┘  └───────────┘  └────────┘  │ │
//!                   │  └──────────────────────────────────────────┘ │
//!                   └───────────────────────────────────────────────┘
//! ```
//!
//! One task per accepted connection; the TLS context and configuration are
//! built once at startup and shared read-only. No state outlives a request
//! except that configuration.

pub mod config;
pub mod error;
pub mod files;
pub mod http;
pub mod lifecycle;
pub mod net;

pub use config::ServerConfig;
pub use error::StartupError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
