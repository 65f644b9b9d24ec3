//! # Emoji Art Client
//!
//! HTTP side of emoji art: the generation endpoint client, the share cache
//! client, and [`ArtworkSession`], which runs the core controller's requests
//! concurrently while keeping last-request-wins ordering.
//!
//! ## Usage
//!
//! ```bash
//! emojiart --emoji 🐶 --style "Van Gogh" --strength 600 \
//!     --generator-url http://localhost:9474/api/generate --out dog.png
//! ```
//!
//! ## Sharing
//!
//! ```bash
//! emojiart --emoji 🦊 --random-seed --share-link \
//!     --generator-url http://localhost:9474/api/generate \
//!     --share-endpoint http://localhost:9474/api/share
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod generation;
pub mod session;
pub mod share;

pub use error::ClientError;
pub use generation::{GenerationRequest, GenerationResponse, HttpImageGenerator, ImageGenerator};
pub use session::ArtworkSession;
pub use share::{CachedShare, ShareClient, ShareLink, WarmRequest};

use std::path::PathBuf;

use clap::Parser;
use emojiart_core::DEFAULT_SHARE_BASE;

/// Command-line arguments for `emojiart`.
#[derive(Debug, Clone, Parser)]
#[command(name = "emojiart")]
#[command(about = "Turn emoji into amazing artwork using AI")]
#[command(version)]
pub struct CliArgs {
    /// Emoji glyph or catalog name (e.g. 🐶 or "dog")
    #[arg(long)]
    pub emoji: Option<String>,

    /// Art style (see --list-styles)
    #[arg(long)]
    pub style: Option<String>,

    /// AI strength, snapped to the slider range
    #[arg(long, allow_negative_numbers = true)]
    pub strength: Option<i64>,

    /// Generation seed
    #[arg(long, conflicts_with = "random_seed")]
    pub seed: Option<u32>,

    /// Roll a random seed
    #[arg(long)]
    pub random_seed: bool,

    /// Restore settings from a share key
    #[arg(long = "share", value_name = "KEY")]
    pub share_key: Option<String>,

    /// Image generation endpoint
    #[arg(long, env = "EMOJIART_GENERATOR_URL")]
    pub generator_url: Option<String>,

    /// Share cache endpoint (e.g. <http://localhost:9474/api/share>)
    #[arg(long, env = "EMOJIART_SHARE_URL")]
    pub share_endpoint: Option<String>,

    /// Public page that share links point at
    #[arg(long, env = "EMOJIART_PUBLIC_URL", default_value = DEFAULT_SHARE_BASE)]
    pub public_url: String,

    /// Warm the share cache and print share links
    #[arg(long)]
    pub share_link: bool,

    /// Sweep strength for this many frames, generating each one
    #[arg(long, value_name = "FRAMES")]
    pub sweep: Option<usize>,

    /// Save the generated image here
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Write an SVG favicon for the selected emoji here
    #[arg(long)]
    pub favicon: Option<PathBuf>,

    /// Print the art style catalog and exit
    #[arg(long)]
    pub list_styles: bool,
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Image generation endpoint.
    pub generator_url: Option<String>,
    /// Share cache endpoint.
    pub share_endpoint: Option<String>,
    /// Base of share links.
    pub public_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            generator_url: None,
            share_endpoint: None,
            public_url: DEFAULT_SHARE_BASE.to_string(),
        }
    }
}

impl From<&CliArgs> for ClientConfig {
    fn from(args: &CliArgs) -> Self {
        Self {
            generator_url: args.generator_url.clone(),
            share_endpoint: args.share_endpoint.clone(),
            public_url: args.public_url.clone(),
        }
    }
}
