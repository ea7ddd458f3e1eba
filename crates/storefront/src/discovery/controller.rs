//! Async driver around [`DiscoveryState`].
//!
//! The state lock is only held while a transition runs, never across a fetch,
//! so reads stay responsive while a page is loading.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, instrument};

use super::source::ProductSource;
use super::state::{Completion, DiscoverySnapshot, DiscoveryState, FetchTicket, SkipReason};

/// Result of a controller request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A fetch ran and its result was applied.
    Applied,
    /// The state changed but its fetch waits for one already in flight.
    Deferred,
    /// No fetch was needed.
    Skipped(SkipReason),
    /// The fetch ran but a newer query superseded it.
    Stale,
}

/// Drives one discovery view against a [`ProductSource`].
///
/// Cheap to clone; clones share the same state.
pub struct DiscoveryController<S> {
    source: Arc<S>,
    state: Arc<Mutex<DiscoveryState>>,
}

impl<S> Clone for DiscoveryController<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            state: Arc::clone(&self.state),
        }
    }
}

impl<S> std::fmt::Debug for DiscoveryController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscoveryController")
            .field("state", &*self.lock())
            .finish_non_exhaustive()
    }
}

impl<S> DiscoveryController<S> {
    fn lock(&self) -> MutexGuard<'_, DiscoveryState> {
        lock_state(&self.state)
    }
}

fn lock_state(state: &Mutex<DiscoveryState>) -> MutexGuard<'_, DiscoveryState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Hands an unsettled ticket back to the state if the fetch future is dropped.
struct PendingFetch<'a> {
    state: &'a Mutex<DiscoveryState>,
    ticket: &'a FetchTicket,
    settled: bool,
}

impl<'a> PendingFetch<'a> {
    const fn new(state: &'a Mutex<DiscoveryState>, ticket: &'a FetchTicket) -> Self {
        Self {
            state,
            ticket,
            settled: false,
        }
    }

    fn settle(mut self) {
        self.settled = true;
    }
}

impl Drop for PendingFetch<'_> {
    fn drop(&mut self) {
        if !self.settled {
            lock_state(self.state).abandon(self.ticket);
        }
    }
}

impl<S: ProductSource> DiscoveryController<S> {
    /// Controller over `source` with a fresh state.
    #[must_use]
    pub fn new(source: S, page_size: u32) -> Self {
        Self::with_state(source, DiscoveryState::new(page_size))
    }

    /// Controller over `source` starting from `state`.
    #[must_use]
    pub fn with_state(source: S, state: DiscoveryState) -> Self {
        Self {
            source: Arc::new(source),
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Copy of the current state for rendering.
    #[must_use]
    pub fn snapshot(&self) -> DiscoverySnapshot {
        self.lock().snapshot()
    }

    /// Load page 1 of the current query.
    #[instrument(skip(self))]
    pub async fn start(&self) -> LoadOutcome {
        let ticket = self.lock().start();
        match ticket {
            Some(ticket) => self.run(ticket).await,
            None => LoadOutcome::Skipped(SkipReason::InFlight),
        }
    }

    /// Search for `term`, clearing any category.
    #[instrument(skip(self))]
    pub async fn submit_search(&self, term: &str) -> LoadOutcome {
        let ticket = self.lock().submit_search(term);
        self.run_or_defer(ticket).await
    }

    /// Filter by `category` (`None` for all), clearing any search term.
    #[instrument(skip(self))]
    pub async fn select_category(&self, category: Option<&str>) -> LoadOutcome {
        let ticket = self.lock().select_category(category);
        self.run_or_defer(ticket).await
    }

    /// Load the next page, if there is one and nothing is in flight.
    #[instrument(skip(self))]
    pub async fn load_more(&self) -> LoadOutcome {
        let ticket = self.lock().load_more();
        match ticket {
            Ok(ticket) => self.run(ticket).await,
            Err(reason) => {
                debug!(?reason, "Load more skipped");
                LoadOutcome::Skipped(reason)
            }
        }
    }

    /// Re-run the last failed fetch.
    #[instrument(skip(self))]
    pub async fn retry(&self) -> LoadOutcome {
        let ticket = self.lock().retry();
        match ticket {
            Ok(ticket) => self.run(ticket).await,
            Err(reason) => LoadOutcome::Skipped(reason),
        }
    }

    async fn run_or_defer(&self, ticket: Option<FetchTicket>) -> LoadOutcome {
        match ticket {
            Some(ticket) => self.run(ticket).await,
            None => LoadOutcome::Deferred,
        }
    }

    /// Run `ticket`, then any fetch a superseding query left owed.
    async fn run(&self, mut ticket: FetchTicket) -> LoadOutcome {
        let mut outcome = LoadOutcome::Applied;
        loop {
            let pending = PendingFetch::new(&self.state, &ticket);
            let result = self.source.fetch_page(ticket.query()).await;
            pending.settle();
            let completion = self.lock().complete(&ticket, result);
            match completion {
                Completion::Applied => return outcome,
                Completion::Stale { next: Some(next) } => {
                    outcome = LoadOutcome::Stale;
                    ticket = next;
                }
                Completion::Stale { next: None } => return LoadOutcome::Stale,
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::error::BrowseError;
    use crate::test_support::{ScriptedSource, catalog};

    #[tokio::test]
    async fn test_scroll_through_three_pages() {
        let controller = DiscoveryController::new(ScriptedSource::new(catalog(45)), 20);

        assert_eq!(controller.start().await, LoadOutcome::Applied);
        assert_eq!(controller.load_more().await, LoadOutcome::Applied);
        assert_eq!(controller.load_more().await, LoadOutcome::Applied);

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.items.len(), 45);
        assert!(!snapshot.has_more);
        assert_eq!(
            controller.load_more().await,
            LoadOutcome::Skipped(SkipReason::Exhausted)
        );
    }

    #[tokio::test]
    async fn test_search_without_matches_shows_empty_state() {
        let controller = DiscoveryController::new(ScriptedSource::new(catalog(45)), 20);
        controller.start().await;

        controller.submit_search("no existe").await;

        let snapshot = controller.snapshot();
        assert!(snapshot.items.is_empty());
        assert!(snapshot.shows_empty_state());
        assert!(!snapshot.has_more);
    }

    #[tokio::test]
    async fn test_retry_after_transient_failure() {
        let source = ScriptedSource::new(catalog(45));
        source.fail_next(BrowseError::Transient("timeout".to_string()));
        let controller = DiscoveryController::new(source, 20);

        controller.start().await;
        assert!(controller.snapshot().error.is_some());
        assert!(controller.snapshot().items.is_empty());

        assert_eq!(controller.retry().await, LoadOutcome::Applied);
        assert_eq!(controller.snapshot().items.len(), 20);
        assert!(controller.snapshot().error.is_none());
    }

    #[tokio::test]
    async fn test_debug_shows_state() {
        let controller = DiscoveryController::new(ScriptedSource::new(catalog(3)), 20);
        controller.start().await;

        let rendered = format!("{controller:?}");
        assert!(rendered.starts_with("DiscoveryController"));
        assert!(rendered.contains("Loaded"));
    }

    #[tokio::test]
    async fn test_aborted_fetch_does_not_leave_controller_loading() {
        let source = ScriptedSource::new(catalog(45)).with_delay(Duration::from_millis(200));
        let controller = DiscoveryController::new(source, 20);
        controller.start().await;

        let task = tokio::spawn({
            let controller = controller.clone();
            async move { controller.load_more().await }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(controller.snapshot().loading);
        task.abort();
        assert!(task.await.unwrap_err().is_cancelled());

        let snapshot = controller.snapshot();
        assert!(!snapshot.loading);
        assert_eq!(snapshot.items.len(), 20);

        assert_eq!(controller.load_more().await, LoadOutcome::Applied);
        assert_eq!(controller.snapshot().items.len(), 40);
    }

    #[tokio::test]
    async fn test_timed_out_fetch_releases_deferred_query() {
        let source = ScriptedSource::new(catalog(45)).with_delay(Duration::from_millis(200));
        let controller = DiscoveryController::new(source, 20);

        let timed_out = tokio::time::timeout(Duration::from_millis(50), controller.start()).await;
        assert!(timed_out.is_err());
        assert!(!controller.snapshot().loading);

        assert_eq!(
            controller.submit_search("Producto 1").await,
            LoadOutcome::Applied
        );
        let snapshot = controller.snapshot();
        assert!(!snapshot.loading);
        assert_eq!(snapshot.search, "Producto 1");
        assert!(!snapshot.items.is_empty());
    }
}
