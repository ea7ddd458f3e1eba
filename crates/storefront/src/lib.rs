//! Mercado Comunidad storefront library.
//!
//! Marketplace API client, the product discovery pipeline (paged loading,
//! category facets, infinite scroll), the local dataset catalog, and the
//! page loaders the CLI renders.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod catalog;
pub mod config;
pub mod discovery;
pub mod error;
pub mod pages;
pub mod routing;

#[cfg(test)]
mod test_support;
