//! Verso Table - Query State for List Views
//!
//! Table-side companion to the Verso wire contract: a per-view query
//! context (`TableFetcher`), its translation into the shared `Filter`,
//! pagination navigation driven by response metadata, and a
//! generation-guarded fetch lifecycle (`TableState`) that discards
//! responses arriving out of order so the last request always wins.

pub mod context;
pub mod error;
pub mod state;

// Re-export commonly used types
pub use context::TableFetcher;
pub use error::{TableError, TableResult};
pub use state::{FetchOutcome, FetchTicket, TableState};
