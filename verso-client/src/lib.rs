//! Verso Client - HTTP Surface
//!
//! Thin, uniform clients over the Verso wire contract: `VersoClient`
//! exposes one list call per catalog resource, `ConsulClient` the
//! secondary service lookup. Configuration comes from a validated TOML
//! file. Transport failures, backend errors, and contract mismatches
//! are reported as distinct error variants and never retried here.

pub mod client;
pub mod config;
pub mod error;

// Re-export commonly used types
pub use client::{ConsulClient, VersoClient};
pub use config::{ClientConfig, ConfigError, SearchSemantics};
pub use error::{ClientError, ClientResult};
