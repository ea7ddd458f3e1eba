//! Local dataset mode: the whole catalog in memory.

mod dataset;
mod listing;
mod local;

pub use dataset::{
    BLOGS_FILE, COMMUNITIES_FILE, CatalogError, Dataset, PRODUCTS_FILE, STORES_FILE,
};
pub use listing::{ListingFilter, ShuffledListing};
pub use local::LocalSource;
