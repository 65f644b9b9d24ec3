//! Request options: the parameters that fully determine a generation.

use rand::Rng;
use serde::Serialize;

use crate::{ArtStylePreset, Emoji};

/// Exclusive upper bound for generation seeds.
pub const SEED_SPACE: u32 = 2_159_232;

/// Strength used when nothing else is chosen.
pub const DEFAULT_STRENGTH: u32 = 550;

/// Seed used when nothing else is chosen.
pub const DEFAULT_SEED: u32 = 0;

/// Longest emoji glyph an option keeps, in characters.
pub const MAX_EMOJI_CHARS: usize = 16;

/// Longest name or prompt an option keeps, in characters.
pub const MAX_TEXT_CHARS: usize = 512;

/// Strength slider configuration shared by every option.
pub const STRENGTH_RANGE: StrengthRange = StrengthRange {
    min: 400,
    max: 700,
    step: 10,
};

/// Allowed strength values: `min..=max` in increments of `step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StrengthRange {
    /// Lowest strength.
    pub min: u32,
    /// Highest strength.
    pub max: u32,
    /// Slider step.
    pub step: u32,
}

impl Default for StrengthRange {
    fn default() -> Self {
        STRENGTH_RANGE
    }
}

impl StrengthRange {
    /// Snap `value` to the nearest step and clamp it into `[min, max]`.
    #[must_use]
    pub fn clamp(&self, value: i64) -> u32 {
        let min = i64::from(self.min);
        let max = i64::from(self.max);
        let step = i64::from(self.step.max(1));

        let bounded = value.clamp(min, max);
        let steps = (bounded - min + step / 2) / step;
        let snapped = (min + steps * step).min(max);
        // snapped lies in [min, max] which fits in u32
        u32::try_from(snapped).unwrap_or(self.min)
    }

    /// Whether `value` is in range and on the step grid.
    #[must_use]
    pub fn contains(&self, value: u32) -> bool {
        value >= self.min
            && value <= self.max
            && (value - self.min) % self.step.max(1) == 0
    }
}

/// Draw a seed uniformly from `[0, SEED_SPACE)`.
pub fn random_seed<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.gen_range(0..SEED_SPACE)
}

/// The tuple of parameters that fully determines a generation request.
///
/// Values are immutable; every `with_*` call returns a replacement. Every
/// value is shareable: strength sits on the grid, the seed is in the seed
/// space, the emoji is never blank and text fields are bounded so the share
/// key stays within its length limit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RequestOption {
    emoji: String,
    name: String,
    prompt: String,
    strength: u32,
    seed: u32,
}

impl RequestOption {
    /// Build an option, clamping strength into [`STRENGTH_RANGE`] and seed
    /// into the seed space.
    ///
    /// A blank emoji becomes the default emoji. Emoji, name and prompt are
    /// cut to [`MAX_EMOJI_CHARS`] / [`MAX_TEXT_CHARS`] characters.
    #[must_use]
    pub fn new(
        emoji: impl Into<String>,
        name: impl Into<String>,
        prompt: impl Into<String>,
        strength: i64,
        seed: u32,
    ) -> Self {
        let emoji = truncate_chars(emoji.into(), MAX_EMOJI_CHARS);
        let emoji = if emoji.trim().is_empty() {
            Emoji::default_emoji().native
        } else {
            emoji
        };
        Self {
            emoji,
            name: truncate_chars(name.into(), MAX_TEXT_CHARS),
            prompt: truncate_chars(prompt.into(), MAX_TEXT_CHARS),
            strength: STRENGTH_RANGE.clamp(strength),
            seed: seed % SEED_SPACE,
        }
    }

    /// Option for a picked emoji with the given style, strength and seed.
    #[must_use]
    pub fn for_emoji(emoji: &Emoji, preset: &ArtStylePreset, strength: i64, seed: u32) -> Self {
        Self::new(
            emoji.native.clone(),
            emoji.describe(),
            preset.prompt,
            strength,
            seed,
        )
    }

    /// The emoji glyph.
    #[must_use]
    pub fn emoji(&self) -> &str {
        &self.emoji
    }

    /// Descriptive label for the emoji.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Style prompt.
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// AI strength.
    #[must_use]
    pub fn strength(&self) -> u32 {
        self.strength
    }

    /// Generation seed.
    #[must_use]
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// The catalog preset this option's prompt belongs to, if any.
    #[must_use]
    pub fn preset(&self) -> Option<&'static ArtStylePreset> {
        ArtStylePreset::by_prompt(&self.prompt)
    }

    /// Replace emoji and name.
    #[must_use]
    pub fn with_emoji(&self, emoji: &Emoji) -> Self {
        Self::new(
            emoji.native.clone(),
            emoji.describe(),
            self.prompt.clone(),
            i64::from(self.strength),
            self.seed,
        )
    }

    /// Replace the style prompt.
    #[must_use]
    pub fn with_preset(&self, preset: &ArtStylePreset) -> Self {
        Self {
            prompt: truncate_chars(preset.prompt.to_string(), MAX_TEXT_CHARS),
            ..self.clone()
        }
    }

    /// Replace strength, clamped into [`STRENGTH_RANGE`].
    #[must_use]
    pub fn with_strength(&self, strength: i64) -> Self {
        Self {
            strength: STRENGTH_RANGE.clamp(strength),
            ..self.clone()
        }
    }

    /// Replace the seed, reduced into the seed space.
    #[must_use]
    pub fn with_seed(&self, seed: u32) -> Self {
        Self {
            seed: seed % SEED_SPACE,
            ..self.clone()
        }
    }
}

fn truncate_chars(mut text: String, max_chars: usize) -> String {
    if let Some((cut, _)) = text.char_indices().nth(max_chars) {
        text.truncate(cut);
    }
    text
}

impl Default for RequestOption {
    fn default() -> Self {
        Self::for_emoji(
            &Emoji::default_emoji(),
            ArtStylePreset::default_preset(),
            i64::from(DEFAULT_STRENGTH),
            DEFAULT_SEED,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_clamp_bounds() {
        let range = StrengthRange::default();
        assert_eq!(range.clamp(-5), 400);
        assert_eq!(range.clamp(0), 400);
        assert_eq!(range.clamp(10_000), 700);
        assert_eq!(range.clamp(i64::MAX), 700);
        assert_eq!(range.clamp(i64::MIN), 400);
    }

    #[test]
    fn test_clamp_snaps_to_step() {
        let range = StrengthRange::default();
        assert_eq!(range.clamp(554), 550);
        assert_eq!(range.clamp(555), 560);
        assert_eq!(range.clamp(699), 700);
        assert!(range.contains(range.clamp(613)));
    }

    #[test]
    fn test_clamp_uneven_range_never_exceeds_max() {
        let range = StrengthRange {
            min: 0,
            max: 25,
            step: 10,
        };
        assert_eq!(range.clamp(24), 20);
        assert_eq!(range.clamp(25), 25);
    }

    #[test]
    fn test_contains() {
        let range = StrengthRange::default();
        assert!(range.contains(400));
        assert!(range.contains(700));
        assert!(!range.contains(405));
        assert!(!range.contains(710));
        assert!(!range.contains(390));
    }

    #[test]
    fn test_random_seed_in_space() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            assert!(random_seed(&mut rng) < SEED_SPACE);
        }
    }

    #[test]
    fn test_default_option() {
        let option = RequestOption::default();
        assert_eq!(option.emoji(), "🐶");
        assert!(option.name().starts_with("super cute Dog, animal"));
        assert_eq!(option.prompt(), ArtStylePreset::default_preset().prompt);
        assert_eq!(option.strength(), DEFAULT_STRENGTH);
        assert_eq!(option.seed(), DEFAULT_SEED);
    }

    #[test]
    fn test_blank_emoji_becomes_default() {
        let option = RequestOption::new("", "Blank", "charcoal", 550, 1);
        assert_eq!(option.emoji(), "🐶");
        assert_eq!(option.name(), "Blank");

        let spaces = RequestOption::new("  ", "Blank", "charcoal", 550, 1);
        assert_eq!(spaces.emoji(), "🐶");

        let padded = format!("{}x", " ".repeat(MAX_EMOJI_CHARS));
        assert_eq!(RequestOption::new(padded, "n", "p", 550, 1).emoji(), "🐶");
    }

    #[test]
    fn test_text_fields_are_bounded() {
        let long = "é".repeat(MAX_TEXT_CHARS + 100);
        let option = RequestOption::new("🐶".repeat(40), long.clone(), long, 550, 0);
        assert_eq!(option.emoji().chars().count(), MAX_EMOJI_CHARS);
        assert_eq!(option.name().chars().count(), MAX_TEXT_CHARS);
        assert_eq!(option.prompt().chars().count(), MAX_TEXT_CHARS);

        let short = RequestOption::new("🐸", "Frog", "sketch", 550, 0);
        assert_eq!(short.name(), "Frog");
    }

    #[test]
    fn test_with_methods_replace_single_field() {
        let base = RequestOption::default();
        let seeded = base.with_seed(SEED_SPACE + 3);
        assert_eq!(seeded.seed(), 3);
        assert_eq!(seeded.emoji(), base.emoji());

        let stronger = base.with_strength(9999);
        assert_eq!(stronger.strength(), 700);
        assert_eq!(stronger.prompt(), base.prompt());
    }
}
