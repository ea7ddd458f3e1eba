//! Product discovery: search, category facets, and paged loading.
//!
//! - [`Query`] holds the filter; search and category exclude each other.
//! - [`DiscoveryState`] is the synchronous state machine.
//! - [`DiscoveryController`] runs fetches against a [`ProductSource`].
//! - [`ScrollTrigger`] turns "last item visible" into `load_more`.

mod controller;
pub mod facets;
mod query;
mod scroll;
mod source;
mod state;

pub use controller::{DiscoveryController, LoadOutcome};
pub use facets::{DEFAULT_FACET_LIMIT, Facet, category_facets, distinct_categories};
pub use query::{DEFAULT_PAGE_SIZE, Query};
pub use scroll::{ScrollTrigger, VisibilityObserver, VisibleCallback, drive_infinite_scroll};
pub use source::{MarketplaceSource, ProductScope, ProductSource};
pub use state::{
    Completion, DiscoverySnapshot, DiscoveryState, FetchTicket, Phase, SkipReason,
};
