//! Verso API - Wire Contract
//!
//! This crate defines the contract every Verso list endpoint speaks: the
//! query `Filter` and its URL query-string codec, the `Envelope` wrapper
//! that carries a page of records plus pagination metadata, the typed
//! records of the six catalog resources, and the thin Consul lookup
//! types. It is pure data and codecs; the HTTP surface lives in
//! `verso-client` and the table-side state in `verso-table`.

pub mod consul;
pub mod envelope;
pub mod error;
pub mod filter;
pub mod resources;

// Re-export commonly used types
pub use consul::{GetServiceRequest, GetServiceResponse};
pub use envelope::{ApiStatus, Envelope, ErrorBody, Meta, Pagination};
pub use error::{FilterError, FilterResult};
pub use filter::{Filter, FilterOrder, SortSpec};
pub use resources::*;
