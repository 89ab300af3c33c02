//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TLS-terminated connection
//!     → server.rs (HTTP/1.1 connection driver, keep-alive, header bound)
//!     → handler.rs (method check, path resolution, file/listing/error)
//!     → response written back on the same stream
//! ```

pub mod handler;
pub mod server;

pub use server::HttpServer;
