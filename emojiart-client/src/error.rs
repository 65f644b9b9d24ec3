//! Error types for the emoji art HTTP clients.

use emojiart_core::ArtError;
use thiserror::Error;

/// Errors that can occur when talking to the generation or share endpoints.
#[derive(Debug, Error)]
pub enum ClientError {
    /// An endpoint URL is invalid.
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(String),
    /// HTTP layer failed (connection, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The endpoint answered with a non-success status.
    #[error("endpoint returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        body: String,
    },
    /// JSON parsing failed.
    #[error("failed to parse response: {0}")]
    Json(#[from] serde_json::Error),
    /// The response did not match the expected structure.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
    /// Writing a downloaded image failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A generation task panicked or was cancelled.
    #[error("generation task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    /// Core state rejected an operation.
    #[error(transparent)]
    Art(#[from] ArtError),
}

/// Longest response body kept in [`ClientError::Status`].
pub(crate) const MAX_ERROR_BODY: usize = 512;

/// Build a [`ClientError::Status`] from a failed response.
pub(crate) async fn status_error(response: reqwest::Response) -> ClientError {
    let status = response.status().as_u16();
    let mut body = response.text().await.unwrap_or_default();
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    ClientError::Status { status, body }
}
