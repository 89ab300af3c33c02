//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (accept loop input, connection limits)
//!     → tls.rs (rustls context, handshake wrapping)
//!     → connection.rs (lifetime tracking for graceful drain)
//!     → hand off to the HTTP layer
//! ```
//!
//! # Design Decisions
//! - The connection-limit semaphore bounds accepts before TLS work starts
//! - The TLS handshake runs inside the connection task, never in the
//!   accept loop
//! - Every connection is tracked so shutdown can drain in-flight work

pub mod connection;
pub mod listener;
pub mod tls;
