//! Infinite scroll: load the next page when the last item becomes visible.
//!
//! Visibility detection is a capability supplied by the rendering surface
//! through [`VisibilityObserver`]. [`ScrollTrigger`] keeps exactly one
//! observation alive, on the current last item, and turns its first
//! visibility event into a signal on a channel. [`drive_infinite_scroll`]
//! consumes those signals and calls [`DiscoveryController::load_more`].

use mercado_core::ProductId;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, instrument};

use super::controller::{DiscoveryController, LoadOutcome};
use super::source::ProductSource;
use super::state::DiscoverySnapshot;

/// Callback invoked when an observed element enters the viewport.
pub type VisibleCallback = Box<dyn FnMut() + Send>;

/// Watches rendered elements for visibility.
///
/// Implementations may call the callback any number of times; the trigger
/// only forwards the first call per observation.
pub trait VisibilityObserver {
    /// Token identifying one observation.
    type Handle;

    /// Start watching the element rendered for `target`.
    fn observe(&mut self, target: ProductId, on_visible: VisibleCallback) -> Self::Handle;

    /// Stop watching. The callback must not be invoked afterwards.
    fn unobserve(&mut self, handle: Self::Handle);
}

/// Keeps one observation on the last rendered item.
pub struct ScrollTrigger<O: VisibilityObserver> {
    observer: O,
    watched: Option<(ProductId, O::Handle)>,
    signals: UnboundedSender<ProductId>,
}

impl<O: VisibilityObserver> std::fmt::Debug for ScrollTrigger<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollTrigger")
            .field("watched", &self.watched_item())
            .finish_non_exhaustive()
    }
}

impl<O: VisibilityObserver> ScrollTrigger<O> {
    /// Trigger that reports visible items on `signals`.
    pub const fn new(observer: O, signals: UnboundedSender<ProductId>) -> Self {
        Self {
            observer,
            watched: None,
            signals,
        }
    }

    /// Item currently observed, if any.
    #[must_use]
    pub fn watched_item(&self) -> Option<ProductId> {
        self.watched.as_ref().map(|(id, _)| *id)
    }

    /// Re-target the observation after the list changed.
    ///
    /// Watches `last` when more pages remain; otherwise watches nothing.
    /// Keeps the existing observation when the last item did not change.
    pub fn sync(&mut self, last: Option<ProductId>, has_more: bool) {
        let target = last.filter(|_| has_more);
        if target.is_some() && target == self.watched_item() {
            return;
        }

        self.detach();

        if let Some(id) = target {
            let signals = self.signals.clone();
            let mut fired = false;
            let handle = self.observer.observe(
                id,
                Box::new(move || {
                    if !fired {
                        fired = true;
                        // Receiver gone means the view is being torn down
                        let _ = signals.send(id);
                    }
                }),
            );
            debug!(item = %id, "Observing last item");
            self.watched = Some((id, handle));
        }
    }

    /// Re-target from a controller snapshot.
    pub fn sync_with(&mut self, snapshot: &DiscoverySnapshot) {
        self.sync(snapshot.last_item().map(|p| p.id), snapshot.has_more);
    }

    /// Drop the current observation, if any.
    pub fn detach(&mut self) {
        if let Some((id, handle)) = self.watched.take() {
            debug!(item = %id, "Released observation");
            self.observer.unobserve(handle);
        }
    }
}

impl<O: VisibilityObserver> Drop for ScrollTrigger<O> {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Turn visibility signals into `load_more` calls until the channel closes.
///
/// A signal for an item that is no longer last (the list moved on, or a new
/// query replaced it) is ignored. `on_change` runs after every applied load so
/// the caller can re-render and re-sync its trigger.
#[instrument(skip_all)]
pub async fn drive_infinite_scroll<S, F>(
    controller: DiscoveryController<S>,
    mut signals: UnboundedReceiver<ProductId>,
    mut on_change: F,
) where
    S: ProductSource,
    F: FnMut(&DiscoverySnapshot),
{
    while let Some(seen) = signals.recv().await {
        let current_last = controller.snapshot().last_item().map(|p| p.id);
        if current_last != Some(seen) {
            debug!(item = %seen, "Ignoring visibility of superseded item");
            continue;
        }

        match controller.load_more().await {
            LoadOutcome::Skipped(reason) => debug!(?reason, "Scroll load skipped"),
            _ => on_change(&controller.snapshot()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::FakeObserver;

    fn id(n: i64) -> ProductId {
        ProductId::new(n)
    }

    #[test]
    fn test_fires_once_per_item() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let observer = FakeObserver::default();
        let mut trigger = ScrollTrigger::new(observer.clone(), tx);

        trigger.sync(Some(id(20)), true);
        observer.reveal(id(20));
        observer.reveal(id(20));

        assert_eq!(rx.try_recv().unwrap(), id(20));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_resync_moves_observation() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let observer = FakeObserver::default();
        let mut trigger = ScrollTrigger::new(observer.clone(), tx);

        trigger.sync(Some(id(20)), true);
        trigger.sync(Some(id(40)), true);

        assert_eq!(observer.active(), vec![id(40)]);
        observer.reveal(id(20));
        assert!(rx.try_recv().is_err());
        observer.reveal(id(40));
        assert_eq!(rx.try_recv().unwrap(), id(40));
    }

    #[test]
    fn test_same_last_item_keeps_observation() {
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        let observer = FakeObserver::default();
        let mut trigger = ScrollTrigger::new(observer.clone(), tx);

        trigger.sync(Some(id(20)), true);
        trigger.sync(Some(id(20)), true);

        assert_eq!(observer.observe_calls(), 1);
    }

    #[test]
    fn test_nothing_watched_when_exhausted() {
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        let observer = FakeObserver::default();
        let mut trigger = ScrollTrigger::new(observer.clone(), tx);

        trigger.sync(Some(id(20)), true);
        trigger.sync(Some(id(45)), false);

        assert!(observer.active().is_empty());
        assert_eq!(trigger.watched_item(), None);
    }

    #[test]
    fn test_drop_releases_observation() {
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        let observer = FakeObserver::default();
        {
            let mut trigger = ScrollTrigger::new(observer.clone(), tx);
            trigger.sync(Some(id(7)), true);
            assert_eq!(observer.active().len(), 1);
        }
        assert!(observer.active().is_empty());
    }

    #[tokio::test]
    async fn test_driver_loads_next_page_and_ignores_stale_items() {
        use crate::discovery::DiscoveryController;
        use crate::test_support::{ScriptedSource, catalog};

        let controller = DiscoveryController::new(ScriptedSource::new(catalog(45)), 20);
        controller.start().await;

        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        // Not the last item: ignored
        tx.send(id(3)).unwrap();
        // Last item of page 1
        tx.send(id(20)).unwrap();
        drop(tx);

        let mut renders = 0;
        drive_infinite_scroll(controller.clone(), rx, |_| renders += 1).await;

        assert_eq!(renders, 1);
        assert_eq!(controller.snapshot().items.len(), 40);
    }
}
