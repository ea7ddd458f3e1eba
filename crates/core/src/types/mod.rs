//! Core types for Mercado Comunidad.
//!
//! This module provides type-safe wrappers and records for the marketplace
//! domain: communities, stores, and the products they publish.

pub mod blog;
pub mod community;
pub mod contact;
pub mod id;
pub mod page;
pub mod price;
pub mod product;
pub mod store;

pub use blog::{BlogPost, long_date_es};
pub use community::Community;
pub use contact::{ContactCard, ContactKind, whatsapp_link};
pub use id::*;
pub use page::{ResultPage, total_pages};
pub use price::Price;
pub use product::Product;
pub use store::Store;
