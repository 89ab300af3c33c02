//! Static content subsystem.
//!
//! # Data Flow
//! ```text
//! Decoded request path
//!     → resolve.rs (percent-decode, normalize, traversal rejection)
//!     → joined under the served root by the handler
//!     → file bytes, or listing.rs when the target is a directory
//! ```
//!
//! # Design Decisions
//! - Resolution is lexical only; the filesystem is consulted after the
//!   path has been proven to stay under the root
//! - Listings are generated on every request, never cached

pub mod listing;
pub mod resolve;
