//! Command implementations.

pub mod browse;
pub mod directory;
pub mod products;

use mercado_storefront::api::ApiError;
use mercado_storefront::catalog::CatalogError;
use mercado_storefront::config::ConfigError;
use mercado_storefront::error::BrowseError;
use thiserror::Error;

/// Errors that abort a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Marketplace API error: {0}")]
    Api(#[from] ApiError),

    #[error("Dataset error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("{}", .0.user_message())]
    Browse(#[from] BrowseError),

    #[error("Failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
}
