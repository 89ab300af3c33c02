//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! TOML file (optional)
//!     → loader.rs (parse & deserialize)
//!     → CLI overrides merged in by the binary
//!     → validation.rs (semantic checks, credential existence)
//!     → ServerConfig (validated, immutable)
//!     → shared via Arc with every connection task
//! ```
//!
//! # Design Decisions
//! - Config is immutable once validated; there is no reload path
//! - All fields have defaults so the server runs with no config at all
//! - Validation separates syntactic (serde) from semantic checks and
//!   reports every violation, not just the first

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::ConfigError;
pub use schema::ServerConfig;
