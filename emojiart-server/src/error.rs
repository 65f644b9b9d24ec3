//! Server error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use emojiart_client::ClientError;
use thiserror::Error;

use crate::metrics;
use crate::validation::ValidationError;

/// Startup configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable could not be parsed.
    #[error("invalid value for {name}: {value}")]
    InvalidValue {
        /// Variable name.
        name: &'static str,
        /// Offending value.
        value: String,
    },

    /// A URL setting is not an absolute URL.
    #[error("invalid URL for {name}: {source}")]
    InvalidUrl {
        /// Variable name.
        name: &'static str,
        /// Parse failure.
        source: url::ParseError,
    },
}

/// Errors returned by API handlers, rendered as JSON `{"error": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Untrusted input failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No cached image for the share key.
    #[error("no cached image for share key")]
    NotFound,

    /// The request body did not describe a usable option.
    #[error("invalid option: {0}")]
    InvalidOption(String),

    /// No upstream generator is configured.
    #[error("image generation is not configured")]
    GeneratorUnavailable,

    /// The upstream generator failed.
    #[error("upstream generation failed: {0}")]
    Upstream(#[from] ClientError),
}

impl ApiError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidOption(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::GeneratorUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Validation(err) = &self {
            metrics::record_validation_failure(err.kind());
        }
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
