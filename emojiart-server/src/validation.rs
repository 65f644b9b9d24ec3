//! Input validation for untrusted data.
//!
//! Share keys and image references arrive from browsers and must be checked
//! before they reach the cache.

use emojiart_core::share::MAX_SHARE_KEY_LEN;
use thiserror::Error;

/// Maximum length of a cached image reference (data URIs included).
pub const MAX_IMAGE_LEN: usize = 8 * 1024 * 1024; // 8MB

/// Validation error types.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Share key exceeds maximum length.
    #[error("share key too long (max {MAX_SHARE_KEY_LEN} chars)")]
    KeyTooLong,
    /// Share key is empty or contains characters outside the URL-safe base64 alphabet.
    #[error("share key contains invalid characters")]
    KeyInvalidChars,
    /// Image reference is empty.
    #[error("image is empty")]
    ImageEmpty,
    /// Image reference exceeds maximum length.
    #[error("image too large (max {MAX_IMAGE_LEN} bytes)")]
    ImageTooLarge,
    /// Image reference is neither an http(s) URL nor an image data URI.
    #[error("image must be an http(s) URL or an image data URI")]
    ImageUnsupportedScheme,
}

impl ValidationError {
    /// Metric label for this failure.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::KeyTooLong | Self::KeyInvalidChars => "share_key",
            Self::ImageEmpty | Self::ImageTooLarge | Self::ImageUnsupportedScheme => "image",
        }
    }
}

/// Check if a character belongs to the URL-safe base64 alphabet.
fn is_valid_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Validate a share key.
///
/// Valid keys:
/// - 1 to `MAX_SHARE_KEY_LEN` characters
/// - URL-safe base64 alphabet only
///
/// # Errors
///
/// Returns [`ValidationError::KeyTooLong`] if the key exceeds the limit.
/// Returns [`ValidationError::KeyInvalidChars`] if the key is empty or contains invalid characters.
pub fn validate_share_key(key: &str) -> Result<(), ValidationError> {
    if key.len() > MAX_SHARE_KEY_LEN {
        return Err(ValidationError::KeyTooLong);
    }
    if key.is_empty() || !key.chars().all(is_valid_key_char) {
        return Err(ValidationError::KeyInvalidChars);
    }
    Ok(())
}

/// Validate an image reference.
///
/// # Errors
///
/// Returns [`ValidationError::ImageEmpty`], [`ValidationError::ImageTooLarge`]
/// or [`ValidationError::ImageUnsupportedScheme`].
pub fn validate_image(image: &str) -> Result<(), ValidationError> {
    if image.is_empty() {
        return Err(ValidationError::ImageEmpty);
    }
    if image.len() > MAX_IMAGE_LEN {
        return Err(ValidationError::ImageTooLarge);
    }
    let lower = image
        .get(..11)
        .map_or_else(|| image.to_ascii_lowercase(), str::to_ascii_lowercase);
    if lower.starts_with("https://") || lower.starts_with("http://") || lower.starts_with("data:image/")
    {
        Ok(())
    } else {
        Err(ValidationError::ImageUnsupportedScheme)
    }
}
