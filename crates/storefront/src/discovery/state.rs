//! Discovery state machine.
//!
//! `Idle -> Loading -> {Loaded, Errored}`, and back to `Loading` on load-more
//! or on a query change. This type does no I/O: each transition that needs
//! data hands out a [`FetchTicket`], and the result is fed back through
//! [`DiscoveryState::complete`].
//!
//! An epoch is the span between two query changes. Items accumulate within an
//! epoch and are cleared when a new one starts. At most one ticket is out at
//! a time; a query change that arrives while one is out takes effect in the
//! state immediately and its fetch is issued once the outstanding ticket
//! comes back (that late result belongs to the old epoch and is dropped).

use mercado_core::{Product, ResultPage};
use serde::Serialize;
use tracing::{debug, warn};

use super::facets::{DEFAULT_FACET_LIMIT, Facet, distinct_categories, facets_for};
use super::query::Query;
use crate::error::{BrowseError, ErrorKind};

/// Coarse lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Loading,
    Loaded,
    /// Last fetch failed. Already accumulated items stay visible.
    Errored(ErrorKind),
}

/// Permission to run one fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    epoch: u64,
    query: Query,
    append: bool,
}

impl FetchTicket {
    /// Query (including page) to fetch.
    #[must_use]
    pub const fn query(&self) -> &Query {
        &self.query
    }

    /// Whether the result extends the list instead of replacing it.
    #[must_use]
    pub const fn appends(&self) -> bool {
        self.append
    }
}

/// Why a load-more request did not produce a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// A fetch is already in flight.
    InFlight,
    /// The last page has been loaded.
    Exhausted,
    /// Nothing failed, so there is nothing to retry.
    NothingToRetry,
}

/// What happened to a completed fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The result (success or failure) was applied to the state.
    Applied,
    /// The result belonged to a superseded epoch and was discarded.
    /// `next` carries the fetch for the current query, if one is owed.
    Stale { next: Option<FetchTicket> },
}

/// Read-only copy of the state for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoverySnapshot {
    pub items: Vec<Product>,
    pub has_more: bool,
    pub loading: bool,
    pub phase: Phase,
    pub error: Option<String>,
    pub search: String,
    pub category: Option<String>,
    pub page: u32,
    pub total_count: u64,
    pub total_pages: u32,
    pub facets: Vec<Facet>,
}

impl DiscoverySnapshot {
    /// Last rendered item, the one the scroll trigger watches.
    #[must_use]
    pub fn last_item(&self) -> Option<&Product> {
        self.items.last()
    }

    /// Whether to show the empty-state message with a "clear filters" action.
    #[must_use]
    pub fn shows_empty_state(&self) -> bool {
        self.items.is_empty() && matches!(self.phase, Phase::Errored(ErrorKind::NotFound))
    }
}

/// Authoritative discovery state.
#[derive(Debug, Clone)]
pub struct DiscoveryState {
    /// Current filter; `page` is the last page successfully loaded.
    query: Query,
    epoch: u64,
    items: Vec<Product>,
    total_count: u64,
    total_pages: u32,
    has_more: bool,
    phase: Phase,
    error: Option<BrowseError>,
    categories: Vec<String>,
    in_flight: bool,
    /// Phase to fall back to if the outstanding fetch is abandoned.
    resting: Phase,
    /// A query change landed while a fetch was out; its page 1 is owed.
    refetch_owed: bool,
    /// Ticket of the last failed fetch in this epoch, for retry.
    failed: Option<FetchTicket>,
}

impl DiscoveryState {
    /// Fresh state with an empty query.
    #[must_use]
    pub fn new(page_size: u32) -> Self {
        Self {
            query: Query::new(page_size),
            epoch: 0,
            items: Vec::new(),
            total_count: 0,
            total_pages: 0,
            has_more: false,
            phase: Phase::Idle,
            error: None,
            categories: Vec::new(),
            in_flight: false,
            resting: Phase::Idle,
            refetch_owed: false,
            failed: None,
        }
    }

    #[must_use]
    pub const fn query(&self) -> &Query {
        &self.query
    }

    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.in_flight
    }

    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.has_more
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub const fn error(&self) -> Option<&BrowseError> {
        self.error.as_ref()
    }

    #[must_use]
    pub const fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Category chips, "all" first.
    #[must_use]
    pub fn facets(&self) -> Vec<Facet> {
        facets_for(&self.categories)
    }

    /// Copy for rendering.
    #[must_use]
    pub fn snapshot(&self) -> DiscoverySnapshot {
        DiscoverySnapshot {
            items: self.items.clone(),
            has_more: self.has_more,
            loading: self.in_flight,
            phase: self.phase,
            error: self.error.as_ref().map(BrowseError::product_listing_message),
            search: self.query.search().to_string(),
            category: self.query.category().map(str::to_string),
            page: self.query.page(),
            total_count: self.total_count,
            total_pages: self.total_pages,
            facets: self.facets(),
        }
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Initial page-1 fetch for the current query.
    pub fn start(&mut self) -> Option<FetchTicket> {
        if self.in_flight {
            return None;
        }
        self.refetch_owed = false;
        Some(self.issue(self.query.at_page(1), false))
    }

    /// Submit a search term. Clears the category and starts a new epoch.
    pub fn submit_search(&mut self, term: &str) -> Option<FetchTicket> {
        let next = self.query.with_search(term);
        self.change_query(next)
    }

    /// Select a category (`None` for all). Clears the search term and starts
    /// a new epoch.
    pub fn select_category(&mut self, category: Option<&str>) -> Option<FetchTicket> {
        let next = self.query.with_category(category);
        self.change_query(next)
    }

    /// Request the next page of the current epoch.
    ///
    /// # Errors
    ///
    /// Returns the reason when no fetch should happen.
    pub fn load_more(&mut self) -> Result<FetchTicket, SkipReason> {
        if self.in_flight {
            return Err(SkipReason::InFlight);
        }
        if !self.has_more {
            return Err(SkipReason::Exhausted);
        }
        let next = self.query.at_page(self.query.page() + 1);
        Ok(self.issue(next, true))
    }

    /// Re-issue the last failed fetch of the current epoch.
    ///
    /// # Errors
    ///
    /// Returns the reason when there is nothing to retry.
    pub fn retry(&mut self) -> Result<FetchTicket, SkipReason> {
        if self.in_flight {
            return Err(SkipReason::InFlight);
        }
        let failed = self
            .failed
            .take()
            .filter(|t| t.epoch == self.epoch)
            .ok_or(SkipReason::NothingToRetry)?;
        Ok(self.issue(failed.query, failed.append))
    }

    /// Apply the outcome of the fetch `ticket` authorized.
    pub fn complete(
        &mut self,
        ticket: &FetchTicket,
        result: Result<ResultPage, BrowseError>,
    ) -> Completion {
        self.in_flight = false;

        if ticket.epoch != self.epoch {
            warn!(
                ticket_epoch = ticket.epoch,
                current_epoch = self.epoch,
                page = ticket.query.page(),
                "Discarding stale discovery response"
            );
            let next = std::mem::take(&mut self.refetch_owed)
                .then(|| self.issue(self.query.at_page(1), false));
            return Completion::Stale { next };
        }

        match result {
            Ok(page) => self.apply_page(ticket, page),
            Err(err) => self.apply_error(ticket, err),
        }
        Completion::Applied
    }

    /// Release `ticket` without a result, because whoever was running it gave
    /// up (task aborted, timeout, view torn down).
    ///
    /// The fetch becomes retryable. A page 1 owed by a query change that
    /// landed mid-flight is turned into the retryable fetch instead, so
    /// [`Self::retry`] or [`Self::start`] picks the current query back up.
    pub fn abandon(&mut self, ticket: &FetchTicket) {
        if !self.in_flight {
            return;
        }
        self.in_flight = false;

        if ticket.epoch == self.epoch {
            self.phase = self.resting;
            self.failed = Some(ticket.clone());
        } else {
            self.phase = Phase::Idle;
            if std::mem::take(&mut self.refetch_owed) {
                self.failed = Some(FetchTicket {
                    epoch: self.epoch,
                    query: self.query.at_page(1),
                    append: false,
                });
            }
        }
        debug!(
            page = ticket.query.page(),
            stale = ticket.epoch != self.epoch,
            "Fetch abandoned before it settled"
        );
    }

    fn change_query(&mut self, next: Query) -> Option<FetchTicket> {
        self.reset_epoch(next);
        if self.in_flight {
            debug!("Query changed while a fetch is in flight, deferring");
            self.refetch_owed = true;
            return None;
        }
        self.refetch_owed = false;
        Some(self.issue(self.query.clone(), false))
    }

    fn reset_epoch(&mut self, query: Query) {
        self.epoch += 1;
        self.query = query;
        self.items.clear();
        self.total_count = 0;
        self.total_pages = 0;
        self.has_more = false;
        self.error = None;
        self.failed = None;
        self.resting = Phase::Idle;
        if !self.in_flight {
            self.phase = Phase::Idle;
        }
    }

    fn issue(&mut self, query: Query, append: bool) -> FetchTicket {
        if self.phase != Phase::Loading {
            self.resting = self.phase;
        }
        self.in_flight = true;
        self.phase = Phase::Loading;
        FetchTicket {
            epoch: self.epoch,
            query,
            append,
        }
    }

    fn apply_page(&mut self, ticket: &FetchTicket, page: ResultPage) {
        let requested = ticket.query.page();
        if page.current_page != requested {
            warn!(
                requested,
                reported = page.current_page,
                "Backend reported a different page than requested"
            );
        }

        let already = if ticket.append { self.items.len() } else { 0 };
        let room = usize::try_from(page.total_count.saturating_sub(already as u64))
            .unwrap_or(usize::MAX);
        let mut incoming = page.items;
        if incoming.len() > room {
            warn!(
                incoming = incoming.len(),
                room, "Page overflows reported total, truncating"
            );
            incoming.truncate(room);
        }

        if ticket.append {
            self.items.extend(incoming);
        } else {
            self.items = incoming;
            if self.categories.is_empty() {
                self.categories = distinct_categories(&self.items, Some(DEFAULT_FACET_LIMIT));
            }
        }

        self.query = ticket.query.clone();
        self.total_count = page.total_count;
        self.total_pages = page.total_pages;
        self.has_more = requested < page.total_pages;
        self.phase = Phase::Loaded;
        self.error = None;
        self.failed = None;

        debug!(
            page = requested,
            items = self.items.len(),
            total = self.total_count,
            has_more = self.has_more,
            "Applied discovery page"
        );
    }

    fn apply_error(&mut self, ticket: &FetchTicket, err: BrowseError) {
        match err.kind() {
            ErrorKind::NotFound => {
                self.has_more = false;
                if !ticket.append {
                    self.total_count = 0;
                    self.total_pages = 0;
                }
                debug!(page = ticket.query.page(), "No results for query");
            }
            ErrorKind::Transient | ErrorKind::Configuration => {
                warn!(
                    error = %err,
                    page = ticket.query.page(),
                    "Discovery fetch failed"
                );
                if err.is_retryable() {
                    self.failed = Some(ticket.clone());
                }
            }
        }
        self.phase = Phase::Errored(err.kind());
        self.error = Some(err);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::{catalog, page_of};

    fn loaded(total: usize, page_size: u32) -> (DiscoveryState, Vec<Product>) {
        let all = catalog(total);
        let mut state = DiscoveryState::new(page_size);
        let ticket = state.start().unwrap();
        state.complete(&ticket, Ok(page_of(&all, 1, page_size)));
        (state, all)
    }

    #[test]
    fn test_start_loads_first_page() {
        let (state, _) = loaded(45, 20);
        assert_eq!(state.items().len(), 20);
        assert!(state.has_more());
        assert_eq!(state.phase(), Phase::Loaded);
        assert!(!state.is_loading());
    }

    #[test]
    fn test_load_more_appends_until_exhausted() {
        let (mut state, all) = loaded(45, 20);

        for page in 2..=3 {
            let ticket = state.load_more().unwrap();
            assert!(ticket.appends());
            assert_eq!(ticket.query().page(), page);
            state.complete(&ticket, Ok(page_of(&all, page, 20)));
        }

        assert_eq!(state.items().len(), 45);
        assert!(!state.has_more());
        assert_eq!(state.load_more(), Err(SkipReason::Exhausted));
    }

    #[test]
    fn test_load_more_while_loading_is_skipped() {
        let (mut state, _) = loaded(45, 20);
        let _ticket = state.load_more().unwrap();
        assert!(state.is_loading());
        assert_eq!(state.load_more(), Err(SkipReason::InFlight));
    }

    #[test]
    fn test_query_change_resets_epoch() {
        let (mut state, all) = loaded(45, 20);
        let ticket = state.load_more().unwrap();
        state.complete(&ticket, Ok(page_of(&all, 2, 20)));

        let ticket = state.select_category(Some("Ropa")).unwrap();
        assert!(state.items().is_empty());
        assert_eq!(state.query().category(), Some("Ropa"));
        assert_eq!(state.query().search(), "");
        assert_eq!(ticket.query().page(), 1);
        assert!(!ticket.appends());
    }

    #[test]
    fn test_query_change_during_flight_is_deferred_and_stale_dropped() {
        let (mut state, all) = loaded(45, 20);
        let old = state.load_more().unwrap();

        assert!(state.submit_search("silla").is_none());
        assert_eq!(state.query().search(), "silla");

        let completion = state.complete(&old, Ok(page_of(&all, 2, 20)));
        let Completion::Stale { next: Some(next) } = completion else {
            panic!("expected a deferred refetch, got {completion:?}");
        };
        assert!(state.items().is_empty());
        assert_eq!(next.query().search(), "silla");
        assert_eq!(next.query().page(), 1);
        assert!(state.is_loading());
    }

    #[test]
    fn test_abandoned_load_more_can_be_retried() {
        let (mut state, all) = loaded(45, 20);
        let ticket = state.load_more().unwrap();

        state.abandon(&ticket);

        assert!(!state.is_loading());
        assert_eq!(state.phase(), Phase::Loaded);
        assert_eq!(state.items().len(), 20);
        let retry = state.retry().unwrap();
        assert_eq!(retry.query().page(), 2);
        state.complete(&retry, Ok(page_of(&all, 2, 20)));
        assert_eq!(state.items().len(), 40);
    }

    #[test]
    fn test_abandon_after_query_change_owes_current_query() {
        let (mut state, _) = loaded(45, 20);
        let old = state.load_more().unwrap();
        assert!(state.submit_search("silla").is_none());

        state.abandon(&old);

        assert!(!state.is_loading());
        assert_eq!(state.phase(), Phase::Idle);
        let next = state.retry().unwrap();
        assert_eq!(next.query().search(), "silla");
        assert_eq!(next.query().page(), 1);
        assert!(!next.appends());
    }

    #[test]
    fn test_abandon_of_settled_ticket_is_ignored() {
        let (mut state, all) = loaded(45, 20);
        let ticket = state.load_more().unwrap();
        state.complete(&ticket, Ok(page_of(&all, 2, 20)));

        state.abandon(&ticket);

        assert_eq!(state.items().len(), 40);
        assert_eq!(state.retry(), Err(SkipReason::NothingToRetry));
    }

    #[test]
    fn test_not_found_clears_has_more_and_keeps_items() {
        let (mut state, _) = loaded(45, 20);
        let ticket = state.load_more().unwrap();
        state.complete(&ticket, Err(BrowseError::NotFound("gone".to_string())));

        assert!(!state.has_more());
        assert_eq!(state.items().len(), 20);
        assert_eq!(state.phase(), Phase::Errored(ErrorKind::NotFound));
    }

    #[test]
    fn test_transient_error_keeps_has_more_and_allows_retry() {
        let (mut state, all) = loaded(45, 20);
        let ticket = state.load_more().unwrap();
        state.complete(&ticket, Err(BrowseError::Transient("timeout".to_string())));

        assert!(state.has_more());
        assert_eq!(state.items().len(), 20);
        assert_eq!(state.query().page(), 1);
        assert_eq!(state.phase(), Phase::Errored(ErrorKind::Transient));
        assert!(state.snapshot().error.is_some());

        let retry = state.retry().unwrap();
        assert_eq!(retry.query().page(), 2);
        state.complete(&retry, Ok(page_of(&all, 2, 20)));
        assert_eq!(state.items().len(), 40);
        assert_eq!(state.retry(), Err(SkipReason::NothingToRetry));
    }

    #[test]
    fn test_overflowing_page_is_truncated_to_total() {
        let all = catalog(10);
        let mut state = DiscoveryState::new(20);
        let ticket = state.start().unwrap();
        let mut page = page_of(&all, 1, 20);
        page.total_count = 8;
        state.complete(&ticket, Ok(page));

        assert_eq!(state.items().len(), 8);
    }

    #[test]
    fn test_categories_only_computed_once() {
        let (mut state, _) = loaded(45, 20);
        let before = state.facets();
        assert!(before.len() > 1);

        let ticket = state.select_category(Some("Cat-0")).unwrap();
        let only = vec![crate::test_support::product(99, "Otra", "Nueva")];
        state.complete(&ticket, Ok(ResultPage::from_slice(&only, 1, 20)));

        assert_eq!(state.facets(), before);
    }
}
