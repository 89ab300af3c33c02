//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     load config → validate → bind listener → build TLS context → serve
//!
//! Shutdown:
//!     SIGINT/SIGTERM (signals.rs)
//!         → Shutdown::trigger (shutdown.rs)
//!         → accept loop stops
//!         → in-flight connections drain, bounded by a timeout
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal and reported once
//! - Drain has a deadline; stragglers are abandoned when it passes

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
