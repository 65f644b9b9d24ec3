//! # Emoji Art Server Library
//!
//! Shared types and functionality for the emoji art server.
//! This library is used by both the binary and integration tests.
//!
//! ## Routes
//!
//! ```text
//! GET  /?share=<key>        page with OpenGraph metadata for the shared option
//! POST /api/share           warm the share cache ({image, key} -> 204)
//! GET  /api/share/{key}     cached image ({key, image} or 404)
//! POST /api/generate        cached image for the option, else upstream generation
//! GET  /health[/live|/ready]
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use emojiart_client::ImageGenerator;
use emojiart_core::DEFAULT_SHARE_BASE;
use url::Url;

pub mod cache;
pub mod error;
pub mod health;
pub mod metrics;
pub mod page;
pub mod routes;
pub mod validation;

pub use cache::{ShareCache, DEFAULT_CACHE_CAPACITY};
pub use error::{ApiError, ConfigError};

/// Default port for the emoji art server.
pub const DEFAULT_PORT: u16 = 9474;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind on localhost.
    pub port: u16,
    /// Upstream image generation endpoint.
    pub generator_url: Option<String>,
    /// Base of share links and the page's canonical URL. Always absolute.
    pub public_url: String,
    /// Maximum number of cached share keys.
    pub cache_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            generator_url: None,
            public_url: DEFAULT_SHARE_BASE.to_string(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl ServerConfig {
    /// Read configuration from `EMOJIART_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set but unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Unset and blank variables fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set but unparseable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(port) = get("EMOJIART_PORT") {
            config.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                name: "EMOJIART_PORT",
                value: port,
            })?;
        }
        if let Some(url) = get("EMOJIART_GENERATOR_URL") {
            Url::parse(&url).map_err(|source| ConfigError::InvalidUrl {
                name: "EMOJIART_GENERATOR_URL",
                source,
            })?;
            config.generator_url = Some(url);
        }
        if let Some(url) = get("EMOJIART_PUBLIC_URL") {
            Url::parse(&url).map_err(|source| ConfigError::InvalidUrl {
                name: "EMOJIART_PUBLIC_URL",
                source,
            })?;
            config.public_url = url;
        }
        if let Some(capacity) = get("EMOJIART_CACHE_CAPACITY") {
            config.cache_capacity =
                capacity.parse().map_err(|_| ConfigError::InvalidValue {
                    name: "EMOJIART_CACHE_CAPACITY",
                    value: capacity,
                })?;
        }
        Ok(config)
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Share key to image cache.
    pub cache: ShareCache,
    /// Optional upstream generator for `/api/generate`.
    pub generator: Option<Arc<dyn ImageGenerator>>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Create state with an empty cache sized from `config`.
    #[must_use]
    pub fn new(config: ServerConfig, generator: Option<Arc<dyn ImageGenerator>>) -> Self {
        Self {
            cache: ShareCache::new(config.cache_capacity),
            generator,
            config: Arc::new(config),
        }
    }

    /// Get a reference to the share cache.
    #[must_use]
    pub fn cache(&self) -> &ShareCache {
        &self.cache
    }

    /// Get a reference to the optional generator.
    #[must_use]
    pub fn generator(&self) -> Option<&Arc<dyn ImageGenerator>> {
        self.generator.as_ref()
    }
}

/// Build the application router (without metrics or middleware layers).
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::page_handler))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route("/health", get(health::readiness))
        .route("/api/share", post(routes::warm_share_handler))
        .route("/api/share/{key}", get(routes::lookup_share_handler))
        .route("/api/generate", post(routes::generate_handler))
        .with_state(state)
}
