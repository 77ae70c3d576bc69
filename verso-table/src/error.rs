//! Error types for table-side query state

use thiserror::Error;
use verso_api::filter::FilterOrder;

/// Errors from translating or navigating a table context.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("Inconsistent sort state: sort={sort:?}, order={order:?}")]
    InvalidState {
        sort: Option<String>,
        order: Option<FilterOrder>,
    },

    #[error("Page {page} is out of range (limit={limit}, total={total:?})")]
    OutOfRange {
        page: u32,
        limit: u32,
        total: Option<u64>,
    },
}

/// Result type alias for table operations.
pub type TableResult<T> = Result<T, TableError>;

// =============================================================================
// TESTS
// =============================================================================
