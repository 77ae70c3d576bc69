//! Fetch lifecycle state for one table view
//!
//! Wraps the query context with the rows on screen, the pagination
//! metadata of the last applied response, and a generation counter.
//! Every fetch gets a ticket stamped with the generation at start; a
//! completion is applied only if its ticket is still the newest, so
//! responses arriving out of order can never clobber a newer page.

use crate::context::TableFetcher;
use crate::error::{TableError, TableResult};
use verso_api::envelope::{Envelope, Pagination};
use verso_api::filter::Filter;

/// Ticket for one fetch. Hold it across the await and redeem it with
/// [`TableState::apply`] or [`TableState::fail`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a fetch ticket must be redeemed with apply or fail"]
pub struct FetchTicket {
    generation: u64,
}

/// What happened to a completed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The completion belonged to the newest fetch and took effect.
    Applied,
    /// A newer fetch had started in the meantime; the completion was
    /// discarded without touching the state.
    Stale,
}

/// Rows, metadata, and fetch lifecycle for one table view.
///
/// Single-owner by design: one view holds one `TableState`, mutations
/// happen on the owning task, and concurrency only enters through
/// fetches suspended at an await. The generation counter is what keeps
/// those suspensions safe; no locking is involved.
#[derive(Debug, Clone)]
pub struct TableState<T> {
    /// Query context the next fetch will be built from.
    pub fetcher: TableFetcher,
    /// Rows currently shown.
    pub rows: Vec<T>,
    /// Pagination metadata of the last applied response.
    pub pagination: Option<Pagination>,
    /// Whether a fetch is outstanding.
    pub loading: bool,
    generation: u64,
}

impl<T> TableState<T> {
    /// Empty state around a fresh context with the given page size.
    pub fn new(limit: u32) -> Self {
        Self {
            fetcher: TableFetcher::new(limit),
            rows: Vec::new(),
            pagination: None,
            loading: false,
            generation: 0,
        }
    }

    /// Build the filter for the current context. A half-set sort is
    /// cleared rather than failing; the fetch path must always produce
    /// a usable filter.
    pub fn current_filter(&mut self) -> Filter {
        if self.fetcher.normalize() {
            tracing::warn!("table context had a half-set sort; cleared it before building the filter");
        }
        // normalize() left the sort pairing consistent, so this cannot fail
        self.fetcher.to_filter().unwrap_or_default()
    }

    /// Start a fetch: marks the view loading and returns the ticket its
    /// completion must present.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.loading = true;
        tracing::debug!(generation = self.generation, "table fetch started");
        FetchTicket {
            generation: self.generation,
        }
    }

    /// Apply a completed fetch. A stale ticket leaves rows, metadata,
    /// and the loading flag untouched.
    pub fn apply(&mut self, ticket: &FetchTicket, envelope: Envelope<T>) -> FetchOutcome {
        if ticket.generation != self.generation {
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale table response"
            );
            return FetchOutcome::Stale;
        }
        self.rows = envelope.data;
        self.pagination = Some(envelope.meta.pagination);
        self.loading = false;
        FetchOutcome::Applied
    }

    /// Record a failed fetch. Clears the loading flag when the ticket is
    /// current ([`FetchOutcome::Applied`]); surfacing the error stays
    /// with the caller. Stale failures are discarded like stale data.
    pub fn fail(&mut self, ticket: &FetchTicket) -> FetchOutcome {
        if ticket.generation != self.generation {
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale table failure"
            );
            return FetchOutcome::Stale;
        }
        self.loading = false;
        FetchOutcome::Applied
    }

    /// Invalidate every outstanding ticket, for view unmount or context
    /// discard. In-flight completions will report [`FetchOutcome::Stale`].
    pub fn cancel_pending(&mut self) {
        self.generation += 1;
        self.loading = false;
    }

    /// Run one full fetch round: build the filter, await the operation,
    /// apply or discard the result. Holding `&mut self` across the await
    /// means completions cannot interleave here; views that overlap
    /// fetches use the manual ticket flow instead.
    pub async fn load_with<F, Fut, E>(&mut self, op: F) -> Result<FetchOutcome, E>
    where
        F: FnOnce(Filter) -> Fut,
        Fut: std::future::Future<Output = Result<Envelope<T>, E>>,
    {
        let filter = self.current_filter();
        let ticket = self.begin_fetch();
        match op(filter).await {
            Ok(envelope) => Ok(self.apply(&ticket, envelope)),
            Err(err) => {
                if self.fail(&ticket) == FetchOutcome::Stale {
                    Ok(FetchOutcome::Stale)
                } else {
                    Err(err)
                }
            }
        }
    }

    /// Whether a later page exists under the last applied metadata.
    /// Unknown metadata means no.
    pub fn has_next_page(&self) -> bool {
        match self.pagination {
            Some(pagination) => {
                u64::from(self.fetcher.page) * u64::from(self.fetcher.limit) < pagination.total
            }
            None => false,
        }
    }

    /// Whether an earlier page exists.
    pub fn has_previous_page(&self) -> bool {
        self.fetcher.page > 1
    }

    /// Total number of pages under the last applied metadata.
    pub fn total_pages(&self) -> Option<u64> {
        self.pagination
            .map(|pagination| pagination.total_pages(self.fetcher.limit))
    }

    /// Move to the next page. Fails without touching the page when the
    /// metadata says there is none (or none has arrived yet).
    pub fn next_page(&mut self) -> TableResult<u32> {
        if !self.has_next_page() {
            return Err(self.out_of_range(self.fetcher.page.saturating_add(1)));
        }
        self.fetcher.page += 1;
        Ok(self.fetcher.page)
    }

    /// Move to the previous page. Fails without touching the page on the
    /// first page.
    pub fn previous_page(&mut self) -> TableResult<u32> {
        if self.fetcher.page <= 1 {
            return Err(self.out_of_range(self.fetcher.page.saturating_sub(1)));
        }
        self.fetcher.page -= 1;
        Ok(self.fetcher.page)
    }

    /// Jump to a 1-based page. With metadata present, a page whose
    /// window starts at or past the total is out of range (page 1 is
    /// always reachable, even when the result set is empty). Before the
    /// first response only `page >= 1` is enforced, so a view can start
    /// deep-linked into a known page.
    pub fn go_to_page(&mut self, page: u32) -> TableResult<u32> {
        if page == 0 {
            return Err(self.out_of_range(0));
        }
        if let Some(pagination) = self.pagination {
            let window_start = u64::from(page - 1) * u64::from(self.fetcher.limit);
            if page > 1 && window_start >= pagination.total {
                return Err(self.out_of_range(page));
            }
        }
        self.fetcher.page = page;
        Ok(page)
    }

    fn out_of_range(&self, page: u32) -> TableError {
        TableError::OutOfRange {
            page,
            limit: self.fetcher.limit,
            total: self.pagination.map(|pagination| pagination.total),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
