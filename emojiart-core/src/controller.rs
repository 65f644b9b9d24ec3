//! Artwork request controller.
//!
//! Owns the user-adjustable state (emoji, style, strength, seed), derives the
//! [`RequestOption`] from it, and decides which generation results may reach
//! the screen.
//!
//! The controller performs no I/O. A driver asks [`next_request`] for work,
//! runs the fetch, and hands the outcome back through [`resolve`]. Results are
//! matched by [`RequestFingerprint`]: an outcome for any option other than the
//! current one is stale and never replaces what is displayed, so the newest
//! input always wins regardless of response order.
//!
//! [`next_request`]: ArtworkRequestController::next_request
//! [`resolve`]: ArtworkRequestController::resolve

use std::collections::{HashMap, VecDeque};
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::effect::EmojiEffect;
use crate::option::random_seed;
use crate::preset::DEFAULT_IMAGE;
use crate::sweep::StrengthSweep;
use crate::{ArtResult, ArtStylePreset, Emoji, RequestOption, ShareLinkEncoder};

/// Default number of generated images remembered per session.
pub const DEFAULT_MEMO_CAPACITY: usize = 32;

/// Reference to a generated image: an `http(s)` URL or a `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeneratedImage(String);

impl GeneratedImage {
    /// Wrap an image reference.
    #[must_use]
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// The image reference.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the reference is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for GeneratedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of a request option, equal to its share key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestFingerprint(String);

impl RequestFingerprint {
    /// Fingerprint of `option`.
    #[must_use]
    pub fn of(option: &RequestOption) -> Self {
        Self(ShareLinkEncoder::encode(option))
    }

    /// The fingerprint as a share key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A generation the driver should perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    id: u64,
    fingerprint: RequestFingerprint,
    option: RequestOption,
}

impl ImageRequest {
    /// Monotonic request number within the controller.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Fingerprint of the requested option.
    #[must_use]
    pub fn fingerprint(&self) -> &RequestFingerprint {
        &self.fingerprint
    }

    /// The option to generate.
    #[must_use]
    pub fn option(&self) -> &RequestOption {
        &self.option
    }
}

/// What [`ArtworkRequestController::resolve`] did with an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The image is now the current artwork.
    Applied,
    /// The outcome belonged to an option that is no longer selected.
    Stale,
    /// The generation failed; the fallback image stays on screen.
    Failed,
}

/// Controller settings.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Image shown before anything has been generated.
    pub default_image: String,
    /// Generated images remembered for revisited options (0 disables).
    pub memo_capacity: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            default_image: DEFAULT_IMAGE.to_string(),
            memo_capacity: DEFAULT_MEMO_CAPACITY,
        }
    }
}

/// Bounded fingerprint -> image map with FIFO eviction.
#[derive(Debug, Default)]
struct ImageMemo {
    capacity: usize,
    entries: HashMap<RequestFingerprint, GeneratedImage>,
    order: VecDeque<RequestFingerprint>,
}

impl ImageMemo {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    fn get(&self, fingerprint: &RequestFingerprint) -> Option<&GeneratedImage> {
        self.entries.get(fingerprint)
    }

    fn insert(&mut self, fingerprint: RequestFingerprint, image: GeneratedImage) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.insert(fingerprint.clone(), image).is_none() {
            self.order.push_back(fingerprint);
        }
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
    }
}

/// Derives generation requests from UI state and tracks their results.
pub struct ArtworkRequestController {
    config: ControllerConfig,
    option: RequestOption,
    fingerprint: RequestFingerprint,
    current: Option<GeneratedImage>,
    previous: Option<GeneratedImage>,
    /// Outstanding requests, at most one per fingerprint.
    in_flight: HashMap<RequestFingerprint, u64>,
    next_id: u64,
    memo: ImageMemo,
    sweep: StrengthSweep,
    effects: Vec<Box<dyn EmojiEffect>>,
}

impl fmt::Debug for ArtworkRequestController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtworkRequestController")
            .field("option", &self.option)
            .field("current", &self.current)
            .field("previous", &self.previous)
            .field("in_flight", &self.in_flight.len())
            .field("playing", &self.sweep.is_playing())
            .finish_non_exhaustive()
    }
}

impl ArtworkRequestController {
    /// Create a controller starting from `option`.
    #[must_use]
    pub fn new(option: RequestOption, config: ControllerConfig) -> Self {
        let fingerprint = RequestFingerprint::of(&option);
        let memo = ImageMemo::new(config.memo_capacity);
        Self {
            config,
            option,
            fingerprint,
            current: None,
            previous: None,
            in_flight: HashMap::new(),
            next_id: 1,
            memo,
            sweep: StrengthSweep::default(),
            effects: Vec::new(),
        }
    }

    /// Create a controller from a share key, falling back to defaults.
    #[must_use]
    pub fn from_share(key: Option<&str>, config: ControllerConfig) -> Self {
        Self::new(ShareLinkEncoder::decode_or_default(key), config)
    }

    /// Register an effect; it runs immediately with the current emoji.
    pub fn add_effect(&mut self, mut effect: Box<dyn EmojiEffect>) {
        effect.emoji_committed(self.option.emoji());
        self.effects.push(effect);
    }

    /// The current request option.
    #[must_use]
    pub fn option(&self) -> &RequestOption {
        &self.option
    }

    /// Fingerprint of the current option.
    #[must_use]
    pub fn fingerprint(&self) -> &RequestFingerprint {
        &self.fingerprint
    }

    /// The style preset of the current option, if it is a catalog preset.
    #[must_use]
    pub fn preset(&self) -> Option<&'static ArtStylePreset> {
        self.option.preset()
    }

    /// Pick a new emoji. Stops the strength sweep.
    pub fn select_emoji(&mut self, emoji: &Emoji) {
        self.sweep.pause();
        let next = self.option.with_emoji(emoji);
        self.commit(next);
    }

    /// Pick an art style by artist identifier.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ArtError::UnknownPreset`] and leaves state unchanged if
    /// the artist is not in the catalog.
    pub fn select_style(&mut self, artist: &str) -> ArtResult<()> {
        let preset = ArtStylePreset::by_artist(artist)?;
        let next = self.option.with_preset(preset);
        self.commit(next);
        Ok(())
    }

    /// Move the strength slider. Ignored while the sweep is playing.
    ///
    /// Returns `false` if the change was rejected.
    pub fn set_strength(&mut self, strength: i64) -> bool {
        if self.sweep.is_playing() {
            tracing::debug!("Strength slider disabled while sweeping");
            return false;
        }
        let next = self.option.with_strength(strength);
        self.commit(next);
        true
    }

    /// Set the generation seed.
    pub fn set_seed(&mut self, seed: u32) {
        let next = self.option.with_seed(seed);
        self.commit(next);
    }

    /// Draw a fresh seed from `rng` and apply it.
    pub fn randomize_seed<R: Rng + ?Sized>(&mut self, rng: &mut R) -> u32 {
        let seed = random_seed(rng);
        self.set_seed(seed);
        seed
    }

    /// Start the strength sweep.
    pub fn play(&mut self) {
        self.sweep.play();
    }

    /// Stop the strength sweep.
    pub fn pause(&mut self) {
        self.sweep.pause();
    }

    /// Whether the strength sweep is running.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.sweep.is_playing()
    }

    /// Advance the sweep by one step unless a generation is loading.
    ///
    /// Returns the new strength when it moved.
    pub fn tick(&mut self) -> Option<u32> {
        let loading = self.is_loading();
        let strength = self.sweep.advance(self.option.strength(), loading)?;
        let next = self.option.with_strength(i64::from(strength));
        self.commit(next);
        Some(strength)
    }

    /// Work for the driver, if the current option still needs an image.
    ///
    /// Returns `None` when the image is already known (including from the
    /// session memo) or a request for this option is outstanding, even one
    /// issued before the user switched away and back.
    pub fn next_request(&mut self) -> Option<ImageRequest> {
        if self.current.is_some() || self.is_loading() {
            return None;
        }
        if let Some(image) = self.memo.get(&self.fingerprint) {
            tracing::debug!("Memo hit for {}", self.option.emoji());
            self.current = Some(image.clone());
            return None;
        }

        let request = ImageRequest {
            id: self.next_id,
            fingerprint: self.fingerprint.clone(),
            option: self.option.clone(),
        };
        self.next_id += 1;
        tracing::debug!(
            "Issuing request #{} for {} (strength {}, seed {})",
            request.id,
            self.option.emoji(),
            self.option.strength(),
            self.option.seed()
        );
        self.in_flight.insert(request.fingerprint.clone(), request.id);
        Some(request)
    }

    /// Apply the outcome of a request obtained from [`Self::next_request`].
    pub fn resolve<E: fmt::Display>(
        &mut self,
        request: &ImageRequest,
        outcome: Result<GeneratedImage, E>,
    ) -> Resolution {
        if self.in_flight.get(&request.fingerprint) == Some(&request.id) {
            self.in_flight.remove(&request.fingerprint);
        }

        if request.fingerprint != self.fingerprint {
            match outcome {
                Ok(image) if !image.is_empty() => {
                    tracing::debug!("Request #{} is stale; memoizing only", request.id);
                    self.memo.insert(request.fingerprint.clone(), image);
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::debug!("Stale request #{} failed: {}", request.id, err);
                }
            }
            return Resolution::Stale;
        }

        match outcome {
            Ok(image) if !image.is_empty() => {
                tracing::debug!("Request #{} applied", request.id);
                self.memo.insert(request.fingerprint.clone(), image.clone());
                self.current = Some(image);
                Resolution::Applied
            }
            Ok(_) => {
                tracing::warn!("Request #{} returned an empty image", request.id);
                Resolution::Failed
            }
            Err(err) => {
                tracing::warn!("Request #{} failed: {}", request.id, err);
                Resolution::Failed
            }
        }
    }

    /// Install an image for the current option without a request, e.g. one
    /// found in the share cache.
    pub fn prime(&mut self, image: GeneratedImage) {
        if image.is_empty() {
            return;
        }
        self.memo.insert(self.fingerprint.clone(), image.clone());
        self.current = Some(image);
    }

    /// Whether a request for the current option is outstanding.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.in_flight.contains_key(&self.fingerprint)
    }

    /// The image generated for the current option, if any.
    #[must_use]
    pub fn current_image(&self) -> Option<&GeneratedImage> {
        self.current.as_ref()
    }

    /// The last image shown before the current option was selected.
    #[must_use]
    pub fn previous_image(&self) -> Option<&GeneratedImage> {
        self.previous.as_ref()
    }

    /// The image to display: current, else previous, else the default.
    #[must_use]
    pub fn displayed_image(&self) -> &str {
        self.current
            .as_ref()
            .or(self.previous.as_ref())
            .map_or(self.config.default_image.as_str(), GeneratedImage::as_str)
    }

    /// Share key of the current option.
    #[must_use]
    pub fn share_key(&self) -> &str {
        self.fingerprint.as_str()
    }

    /// Share URL of the current option under `base`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ArtError::InvalidUrl`] if `base` is not absolute.
    pub fn share_url(&self, base: &str) -> ArtResult<Url> {
        ShareLinkEncoder::share_url(base, self.share_key())
    }

    fn commit(&mut self, next: RequestOption) {
        if next == self.option {
            return;
        }
        let emoji_changed = next.emoji() != self.option.emoji();

        if let Some(image) = self.current.take() {
            self.previous = Some(image);
        }
        self.fingerprint = RequestFingerprint::of(&next);
        self.option = next;
        self.current = self.memo.get(&self.fingerprint).cloned();

        if emoji_changed {
            for effect in &mut self.effects {
                effect.emoji_committed(self.option.emoji());
            }
        }
    }
}

impl Default for ArtworkRequestController {
    fn default() -> Self {
        Self::new(RequestOption::default(), ControllerConfig::default())
    }
}
