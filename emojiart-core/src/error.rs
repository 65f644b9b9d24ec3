//! Error types for emoji art operations.

use thiserror::Error;

/// Result type for emoji art operations.
pub type ArtResult<T> = Result<T, ArtError>;

/// Errors that can occur in emoji art operations.
#[derive(Debug, Error)]
pub enum ArtError {
    /// No art style preset with the given artist identifier.
    #[error("Unknown art style: {0}")]
    UnknownPreset(String),

    /// The emoji is not in the built-in catalog.
    #[error("Unknown emoji: {0}")]
    UnknownEmoji(String),

    /// The share key could not be decoded.
    #[error("Malformed share key: {0}")]
    MalformedShareKey(String),

    /// The share key decoded but described an invalid option.
    #[error("Invalid shared option: {0}")]
    InvalidShareOption(String),

    /// Share URL could not be built.
    #[error("Invalid share URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
