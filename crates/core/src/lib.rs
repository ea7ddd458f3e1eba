//! Mercado Core - Shared domain types.
//!
//! This crate provides the types used across all Mercado Comunidad components:
//! - `storefront` - Marketplace client, discovery pipeline, and page loaders
//! - `cli` - Command-line browser over the storefront library
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, prices, catalog entities, blog posts, result pages, and contact helpers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
