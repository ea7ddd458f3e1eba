//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required (api mode)
//! - `MERCADO_API_URL` - Base URL of the marketplace backend (e.g., `https://api.mercadocomunidad.cl`)
//! - `MERCADO_PUBLIC_TOKEN` - Static bearer token for the public endpoints
//!
//! ## Optional
//! - `MERCADO_DATA_SOURCE` - `api` or `local` (default: api)
//! - `MERCADO_DATASET_DIR` - Directory holding the local JSON dataset (default: crates/storefront/data)
//! - `MERCADO_PAGE_SIZE` - Discovery page size (default: 20)
//! - `MERCADO_STORE_PAGE_SIZE` - Store listing page size (default: 12)
//! - `MERCADO_HTTP_TIMEOUT_SECS` - Request timeout in seconds (default: 10)

use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

use crate::discovery::DEFAULT_PAGE_SIZE;
use crate::pages::STORE_PAGE_SIZE;

const MAX_PAGE_SIZE: u32 = 100;
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_DATASET_DIR: &str = "crates/storefront/data";
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "put-your",
    "add-your",
    "tu-token",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Where product data comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataSourceMode {
    /// Paged REST backend.
    #[default]
    Api,
    /// Complete local JSON dataset, filtered in memory.
    Local,
}

impl FromStr for DataSourceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "api" => Ok(Self::Api),
            "local" => Ok(Self::Local),
            other => Err(format!("expected 'api' or 'local', got '{other}'")),
        }
    }
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Which data source backs product listings
    pub data_source: DataSourceMode,
    /// Marketplace API settings (always present in api mode)
    pub api: Option<ApiConfig>,
    /// Directory with `products.json`, `community.json`, `stores.json`, and `blogs.json`
    pub dataset_dir: PathBuf,
    /// Page size for product discovery
    pub page_size: u32,
    /// Page size for store-scoped listings
    pub store_page_size: u32,
}

/// Marketplace API configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct ApiConfig {
    /// Base URL; endpoint paths are appended to it
    pub base_url: Url,
    /// Bearer token attached to every request
    pub public_token: SecretString,
    /// Per-request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("public_token", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the token fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`Self::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let data_source = env.parse_or("MERCADO_DATA_SOURCE", DataSourceMode::default())?;
        let api = match data_source {
            DataSourceMode::Api => Some(ApiConfig::from_env(&env)?),
            // Local mode still talks to the API for community and store pages when configured
            DataSourceMode::Local if env.optional("MERCADO_API_URL").is_some() => {
                Some(ApiConfig::from_env(&env)?)
            }
            DataSourceMode::Local => None,
        };

        let dataset_dir = PathBuf::from(env.or_default("MERCADO_DATASET_DIR", DEFAULT_DATASET_DIR));
        let page_size = env.page_size("MERCADO_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        let store_page_size = env.page_size("MERCADO_STORE_PAGE_SIZE", STORE_PAGE_SIZE)?;

        Ok(Self {
            data_source,
            api,
            dataset_dir,
            page_size,
            store_page_size,
        })
    }

    /// API settings, or a configuration error naming the missing variable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` when running without API settings.
    pub fn require_api(&self) -> Result<&ApiConfig, ConfigError> {
        self.api
            .as_ref()
            .ok_or_else(|| ConfigError::MissingEnvVar("MERCADO_API_URL".to_string()))
    }
}

impl ApiConfig {
    fn from_env<F>(env: &Env<F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url = env.required("MERCADO_API_URL")?;
        let base_url = Url::parse(raw_url.trim_end_matches('/')).map_err(|e| {
            ConfigError::InvalidEnvVar("MERCADO_API_URL".to_string(), e.to_string())
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidEnvVar(
                "MERCADO_API_URL".to_string(),
                "must be an absolute http(s) URL".to_string(),
            ));
        }

        let public_token = env.validated_secret("MERCADO_PUBLIC_TOKEN")?;
        let timeout_secs = env.parse_or("MERCADO_HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;

        Ok(Self {
            base_url,
            public_token,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Build the URL for an endpoint from its path segments.
    ///
    /// Segments are percent-encoded, so slugs from route parameters are safe
    /// to pass through.
    #[must_use]
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Base URLs are checked to be hierarchical at load time
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup wrapper shared by the loaders.
struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get an optional variable; empty values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key).map_or(Ok(default), |raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }

    /// Parse a page size and check it is within `1..=MAX_PAGE_SIZE`.
    fn page_size(&self, key: &str, default: u32) -> Result<u32, ConfigError> {
        let size = self.parse_or(key, default)?;
        if size == 0 || size > MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("must be between 1 and {MAX_PAGE_SIZE} (got {size})"),
            ));
        }
        Ok(size)
    }

    /// Load and validate a secret.
    fn validated_secret(&self, key: &str) -> Result<SecretString, ConfigError> {
        let value = self.required(key)?;
        validate_secret_strength(&value, key)?;
        Ok(SecretString::from(value))
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Real tokens (JWTs, API keys) have high entropy
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
            ),
        ));
    }

    Ok(())
}

/// Expose the token for an outgoing `Authorization` header.
pub(crate) fn bearer(config: &ApiConfig) -> &str {
    config.public_token.expose_secret()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.aB3xY9mK2nL5pQ7rT0uW4zC6";

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-public-token", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_api_mode_defaults() {
        let config = StorefrontConfig::from_lookup(lookup(&[
            ("MERCADO_API_URL", "https://api.mercadocomunidad.cl/"),
            ("MERCADO_PUBLIC_TOKEN", TOKEN),
        ]))
        .unwrap();

        assert_eq!(config.data_source, DataSourceMode::Api);
        assert_eq!(config.page_size, 20);
        assert_eq!(config.store_page_size, 12);
        let api = config.require_api().unwrap();
        assert_eq!(api.timeout, Duration::from_secs(10));
        assert_eq!(
            api.endpoint(&["public", "products"]).as_str(),
            "https://api.mercadocomunidad.cl/public/products"
        );
        assert_eq!(
            api.endpoint(&["public", "stores", "la tienda"]).as_str(),
            "https://api.mercadocomunidad.cl/public/stores/la%20tienda"
        );
    }

    #[test]
    fn test_api_mode_requires_url() {
        let result = StorefrontConfig::from_lookup(lookup(&[("MERCADO_PUBLIC_TOKEN", TOKEN)]));
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(key)) if key == "MERCADO_API_URL"));
    }

    #[test]
    fn test_local_mode_without_api() {
        let config = StorefrontConfig::from_lookup(lookup(&[
            ("MERCADO_DATA_SOURCE", "local"),
            ("MERCADO_DATASET_DIR", "/srv/mercado/data"),
        ]))
        .unwrap();

        assert_eq!(config.data_source, DataSourceMode::Local);
        assert!(config.api.is_none());
        assert!(config.require_api().is_err());
        assert_eq!(config.dataset_dir, PathBuf::from("/srv/mercado/data"));
    }

    #[test]
    fn test_invalid_page_size() {
        let result = StorefrontConfig::from_lookup(lookup(&[
            ("MERCADO_DATA_SOURCE", "local"),
            ("MERCADO_PAGE_SIZE", "0"),
        ]));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_invalid_data_source() {
        let result = StorefrontConfig::from_lookup(lookup(&[("MERCADO_DATA_SOURCE", "graphql")]));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_api_config_debug_redacts_token() {
        let config = StorefrontConfig::from_lookup(lookup(&[
            ("MERCADO_API_URL", "https://api.mercadocomunidad.cl"),
            ("MERCADO_PUBLIC_TOKEN", TOKEN),
        ]))
        .unwrap();

        let debug_output = format!("{:?}", config.require_api().unwrap());
        assert!(debug_output.contains("api.mercadocomunidad.cl"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains(TOKEN));
    }
}
