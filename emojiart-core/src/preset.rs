//! Art style presets.
//!
//! The catalog is fixed at build time. Presets are selected by their artist
//! identifier; the first entry is the default style.

use serde::Serialize;

use crate::{ArtError, ArtResult};

/// Image shown before any artwork has been generated.
pub const DEFAULT_IMAGE: &str = "/preset.png";

/// A named art style template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArtStylePreset {
    /// Identifier shown in the style selector.
    pub artist: &'static str,
    /// Style prompt sent to the generation endpoint.
    pub prompt: &'static str,
}

/// The built-in style catalog.
pub const PRESETS: &[ArtStylePreset] = &[
    ArtStylePreset {
        artist: "Pixar",
        prompt: "3d render in the style of Pixar, soft studio lighting, cute, vibrant colors, highly detailed",
    },
    ArtStylePreset {
        artist: "Van Gogh",
        prompt: "oil painting in the style of Vincent van Gogh, thick impasto brush strokes, swirling starry sky",
    },
    ArtStylePreset {
        artist: "Ghibli",
        prompt: "Studio Ghibli anime style, hand drawn, soft watercolor background, warm afternoon light",
    },
    ArtStylePreset {
        artist: "Hokusai",
        prompt: "ukiyo-e woodblock print in the style of Katsushika Hokusai, bold outlines, muted indigo palette",
    },
    ArtStylePreset {
        artist: "Pixel Art",
        prompt: "16-bit pixel art, retro video game sprite, limited palette, crisp edges",
    },
    ArtStylePreset {
        artist: "Lego",
        prompt: "built from Lego bricks, toy photography, shallow depth of field, plastic sheen",
    },
    ArtStylePreset {
        artist: "Picasso",
        prompt: "cubist painting in the style of Pablo Picasso, fragmented geometric shapes, bold color blocks",
    },
];

impl ArtStylePreset {
    /// The default style (first catalog entry).
    #[must_use]
    pub fn default_preset() -> &'static Self {
        &PRESETS[0]
    }

    /// Look up a preset by artist identifier (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`ArtError::UnknownPreset`] if no preset matches.
    pub fn by_artist(artist: &str) -> ArtResult<&'static Self> {
        PRESETS
            .iter()
            .find(|p| p.artist.eq_ignore_ascii_case(artist.trim()))
            .ok_or_else(|| ArtError::UnknownPreset(artist.to_string()))
    }

    /// Find the preset whose prompt matches exactly.
    #[must_use]
    pub fn by_prompt(prompt: &str) -> Option<&'static Self> {
        PRESETS.iter().find(|p| p.prompt == prompt)
    }

    /// Catalog index of the preset with this prompt.
    #[must_use]
    pub fn index_of_prompt(prompt: &str) -> Option<usize> {
        PRESETS.iter().position(|p| p.prompt == prompt)
    }

    /// Preset at a catalog index.
    #[must_use]
    pub fn by_index(index: usize) -> Option<&'static Self> {
        PRESETS.get(index)
    }
}
