//! Side effects keyed off the selected emoji.
//!
//! The controller calls every registered [`EmojiEffect`] after it commits a
//! new emoji, and once at registration so the effect starts in sync.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Handler invoked after the selected emoji changes.
pub trait EmojiEffect: Send {
    /// Called with the newly committed emoji glyph.
    fn emoji_committed(&mut self, emoji: &str);
}

/// SVG document showing `emoji` full-bleed, suitable as a favicon.
#[must_use]
pub fn favicon_svg(emoji: &str) -> String {
    let escaped = emoji
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 100 100\">\
         <text y=\".9em\" font-size=\"90\">{escaped}</text></svg>"
    )
}

/// `data:` URI of [`favicon_svg`], usable in `<link rel="icon">`.
#[must_use]
pub fn favicon_data_uri(emoji: &str) -> String {
    let encoded = STANDARD.encode(favicon_svg(emoji));
    format!("data:image/svg+xml;base64,{encoded}")
}

/// Tracks the favicon for the current emoji.
#[derive(Debug, Clone, Default)]
pub struct FaviconEffect {
    href: Option<String>,
    updates: usize,
}

impl FaviconEffect {
    /// Create an effect with no favicon yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current favicon `data:` URI.
    #[must_use]
    pub fn href(&self) -> Option<&str> {
        self.href.as_deref()
    }

    /// How many times the favicon was replaced.
    #[must_use]
    pub fn updates(&self) -> usize {
        self.updates
    }
}

impl EmojiEffect for FaviconEffect {
    fn emoji_committed(&mut self, emoji: &str) {
        tracing::debug!("Favicon set to {}", emoji);
        self.href = Some(favicon_data_uri(emoji));
        self.updates += 1;
    }
}

impl<F> EmojiEffect for F
where
    F: FnMut(&str) + Send,
{
    fn emoji_committed(&mut self, emoji: &str) {
        self(emoji);
    }
}
