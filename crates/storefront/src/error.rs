//! Browse error taxonomy.
//!
//! Every failure a visitor can run into folds into one of three kinds:
//! nothing matched, something transient went wrong, or the route/config is
//! unusable. Loaders convert errors into state at the await point; nothing
//! here is meant to bubble up to the rendering surface unhandled.

use serde::Serialize;
use thiserror::Error;

use crate::api::ApiError;
use crate::catalog::CatalogError;
use crate::config::ConfigError;

/// Broad category of a [`BrowseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Transient,
    Configuration,
}

/// Application-level error type for browsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrowseError {
    /// Entity or query yielded nothing. Not fatal.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Network or server failure. Eligible for retry.
    #[error("Transient error: {0}")]
    Transient(String),

    /// Missing route parameter or unusable configuration. Blocks the view.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl BrowseError {
    /// Which kind of failure this is.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Transient(_) => ErrorKind::Transient,
            Self::Configuration(_) => ErrorKind::Configuration,
        }
    }

    /// Whether retrying the same request could succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_))
    }

    /// Text shown to visitors, for any kind of page. Internal details stay
    /// in the logs.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound(_) => "No se encontraron resultados.".to_string(),
            Self::Transient(_) => {
                "Error al cargar la información. Intenta nuevamente.".to_string()
            }
            // Configuration messages are written for visitors already
            Self::Configuration(msg) => msg.clone(),
        }
    }

    /// Text shown in place of a product listing.
    #[must_use]
    pub fn product_listing_message(&self) -> String {
        match self {
            Self::NotFound(_) => {
                "No se encontraron productos que coincidan con tu búsqueda.".to_string()
            }
            Self::Transient(_) => {
                "Error al cargar los productos. Intenta nuevamente.".to_string()
            }
            Self::Configuration(_) => self.user_message(),
        }
    }
}

impl From<ApiError> for BrowseError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::NotFound(what) => Self::NotFound(what),
            other => Self::Transient(other.to_string()),
        }
    }
}

impl From<ConfigError> for BrowseError {
    fn from(err: ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}

impl From<CatalogError> for BrowseError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Io { .. } => Self::Configuration(err.to_string()),
            CatalogError::Parse { .. } => Self::Transient(err.to_string()),
        }
    }
}

/// Result type alias for `BrowseError`.
pub type Result<T> = std::result::Result<T, BrowseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browse_error_display() {
        let err = BrowseError::NotFound("public/products".to_string());
        assert_eq!(err.to_string(), "Not found: public/products");
    }

    #[test]
    fn test_api_errors_fold_into_kinds() {
        let err: BrowseError = ApiError::NotFound("x".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(!err.is_retryable());

        let err: BrowseError = ApiError::RateLimited(5).into();
        assert_eq!(err.kind(), ErrorKind::Transient);
        assert!(err.is_retryable());

        let err: BrowseError = ApiError::Malformed {
            endpoint: "/public/products".to_string(),
            reason: "missing field `total`".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Transient);
    }

    #[test]
    fn test_config_error_blocks() {
        let err: BrowseError = ConfigError::MissingEnvVar("MERCADO_API_URL".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_user_messages_hide_internals() {
        let err = BrowseError::Transient("HTTP 500: stack trace".to_string());
        assert!(!err.user_message().contains("stack trace"));
        assert!(!err.product_listing_message().contains("stack trace"));

        let err = BrowseError::Configuration("Comunidad no encontrada".to_string());
        assert_eq!(err.user_message(), "Comunidad no encontrada");
        assert_eq!(err.product_listing_message(), "Comunidad no encontrada");
    }

    #[test]
    fn test_generic_message_does_not_mention_products() {
        let transient = BrowseError::Transient("timeout".to_string());
        let missing = BrowseError::NotFound("public/communities".to_string());

        assert!(!transient.user_message().contains("productos"));
        assert!(!missing.user_message().contains("productos"));
        assert_eq!(
            transient.product_listing_message(),
            "Error al cargar los productos. Intenta nuevamente."
        );
    }
}
