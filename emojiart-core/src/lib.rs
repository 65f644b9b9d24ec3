//! # Emoji Art Core
//!
//! State for turning an emoji into AI artwork. No I/O happens here; the
//! client and server crates drive the network side.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                  emojiart-core                   │
//! ├──────────────────────────────────────────────────┤
//! │  Emoji / Preset    │  ArtworkRequestController   │
//! │  - catalog lookup  │  - RequestOption derivation │
//! │  - request naming  │  - last-request-wins        │
//! │                    │  - fallback image           │
//! ├──────────────────────────────────────────────────┤
//! │  ShareLinkEncoder  │  StrengthSweep │  Effects   │
//! └──────────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod controller;
pub mod effect;
pub mod emoji;
pub mod error;
pub mod option;
pub mod preset;
pub mod share;
pub mod sweep;

pub use controller::{
    ArtworkRequestController, ControllerConfig, GeneratedImage, ImageRequest, RequestFingerprint,
    Resolution,
};
pub use effect::{favicon_data_uri, favicon_svg, EmojiEffect, FaviconEffect};
pub use emoji::Emoji;
pub use error::{ArtError, ArtResult};
pub use option::{
    random_seed, RequestOption, StrengthRange, DEFAULT_SEED, DEFAULT_STRENGTH, MAX_EMOJI_CHARS,
    MAX_TEXT_CHARS, SEED_SPACE, STRENGTH_RANGE,
};
pub use preset::{ArtStylePreset, DEFAULT_IMAGE, PRESETS};
pub use share::{ShareLinkEncoder, SocialNetwork, DEFAULT_SHARE_BASE, SHARE_PARAM};
pub use sweep::{StrengthSweep, SweepDirection};

/// Emoji art core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
