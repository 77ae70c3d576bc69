//! Table-side query context
//!
//! One `TableFetcher` per table view: the structured column filters, the
//! free-text search box, the current page and page size, and the single
//! sorted column. The mutators keep two rules: `sort` and `order` are set
//! and cleared together, and any change to what matches (filters, search,
//! sort, page size) resets the page to 1 so the view never lands on a
//! page that no longer exists.

use crate::error::{TableError, TableResult};
use std::collections::BTreeMap;
use verso_api::filter::{Filter, FilterOrder, SortSpec};

/// Query state behind one table view.
///
/// Owned exclusively by its view and never persisted. Fields are public
/// for rendering; mutations should go through the methods, which keep
/// `page`/`limit` positive and the sort pairing consistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableFetcher {
    /// Structured constraints: column name to matched value.
    pub query: Option<BTreeMap<String, String>>,
    /// Free-text search box contents.
    pub query_string: Option<String>,
    /// Current 1-based page.
    pub page: u32,
    /// Page size.
    pub limit: u32,
    /// Sorted column, if any.
    pub sort: Option<String>,
    /// Direction of the sorted column. Present exactly when `sort` is.
    pub order: Option<FilterOrder>,
}

impl TableFetcher {
    /// Fresh context on the first page with the given page size.
    pub fn new(limit: u32) -> Self {
        Self {
            query: None,
            query_string: None,
            page: 1,
            limit: limit.max(1),
            sort: None,
            order: None,
        }
    }

    /// Set a column filter and return to the first page.
    pub fn set_field(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.query
            .get_or_insert_with(BTreeMap::new)
            .insert(field.into(), value.into());
        self.page = 1;
    }

    /// Remove a column filter and return to the first page. Dropping the
    /// last filter clears the map entirely.
    pub fn clear_field(&mut self, field: &str) {
        if let Some(query) = &mut self.query {
            query.remove(field);
            if query.is_empty() {
                self.query = None;
            }
        }
        self.page = 1;
    }

    /// Set the free-text search and return to the first page. An empty
    /// string clears the search.
    pub fn set_search(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.query_string = if text.is_empty() { None } else { Some(text) };
        self.page = 1;
    }

    /// Clear the free-text search and return to the first page.
    pub fn clear_search(&mut self) {
        self.query_string = None;
        self.page = 1;
    }

    /// Sort by a column in the given direction and return to the first
    /// page.
    pub fn sorted_by(&mut self, field: impl Into<String>, order: FilterOrder) {
        self.sort = Some(field.into());
        self.order = Some(order);
        self.page = 1;
    }

    /// Column-header click cycle: unsorted to ascending to descending to
    /// unsorted. Clicking a different column restarts at ascending.
    /// Returns to the first page.
    pub fn toggle_sort(&mut self, field: impl Into<String>) {
        let field = field.into();
        match (&self.sort, self.order) {
            (Some(current), Some(FilterOrder::Asc)) if *current == field => {
                self.order = Some(FilterOrder::Desc);
            }
            (Some(current), Some(FilterOrder::Desc)) if *current == field => {
                self.sort = None;
                self.order = None;
            }
            _ => {
                self.sort = Some(field);
                self.order = Some(FilterOrder::Asc);
            }
        }
        self.page = 1;
    }

    /// Remove the sort and return to the first page.
    pub fn clear_sort(&mut self) {
        self.sort = None;
        self.order = None;
        self.page = 1;
    }

    /// Change the page size and return to the first page. Zero is
    /// clamped to 1.
    pub fn set_limit(&mut self, limit: u32) {
        self.limit = limit.max(1);
        self.page = 1;
    }

    /// Whether the sort pairing holds: `sort` and `order` both present
    /// or both absent.
    pub fn is_consistent(&self) -> bool {
        self.sort.is_some() == self.order.is_some()
    }

    /// Repair a broken sort pairing by clearing both halves. Returns
    /// whether anything changed.
    pub fn normalize(&mut self) -> bool {
        if self.is_consistent() {
            return false;
        }
        self.sort = None;
        self.order = None;
        true
    }

    /// Translate the context into the shared wire filter.
    ///
    /// Deterministic and idempotent: the same context always yields an
    /// equal filter, which encodes to identical query pairs. `limit` and
    /// `page` are always set; absent search/filters stay absent; the
    /// single sorted column becomes a one-key sort mapping. Fails with
    /// [`TableError::InvalidState`] when the sort pairing is broken.
    pub fn to_filter(&self) -> TableResult<Filter> {
        let sort = match (&self.sort, self.order) {
            (Some(field), Some(order)) => Some(SortSpec::single(field.clone(), order)),
            (None, None) => None,
            (sort, order) => {
                return Err(TableError::InvalidState {
                    sort: sort.clone(),
                    order,
                })
            }
        };
        Ok(Filter {
            query: self.query.clone().filter(|query| !query.is_empty()),
            query_string: self.query_string.clone(),
            limit: Some(self.limit),
            page: Some(self.page),
            sort,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================


// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================
