//! Emoji selection and request naming.

use serde::{Deserialize, Serialize};

use crate::{ArtError, ArtResult};

/// Keyword that marks an emoji as an animal.
const ANIMAL_KEYWORD: &str = "animal";

/// Prefix added to animal names.
const ANIMAL_PREFIX: &str = "super cute";

/// An emoji as delivered by the picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emoji {
    /// The native glyph, e.g. `🐶`.
    pub native: String,
    /// Human readable name, e.g. `Dog`.
    pub name: String,
    /// Search keywords in picker order.
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl Emoji {
    /// Create an emoji from its parts.
    #[must_use]
    pub fn new(native: impl Into<String>, name: impl Into<String>, keywords: &[&str]) -> Self {
        Self {
            native: native.into(),
            name: name.into(),
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
        }
    }

    /// Whether the picker tagged this emoji as an animal.
    #[must_use]
    pub fn is_animal(&self) -> bool {
        self.keywords.iter().any(|k| k == ANIMAL_KEYWORD)
    }

    /// Descriptive label sent to the generator.
    ///
    /// `"super cute Dog, animal, friend, ..."` for animals,
    /// `"Red Heart, love, like, ..."` otherwise.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut label = String::new();
        if self.is_animal() {
            label.push_str(ANIMAL_PREFIX);
            label.push(' ');
        }
        label.push_str(&self.name);
        for keyword in &self.keywords {
            label.push_str(", ");
            label.push_str(keyword);
        }
        label
    }

    /// Resolve an emoji from the built-in catalog by glyph or name.
    ///
    /// # Errors
    ///
    /// Returns [`ArtError::UnknownEmoji`] if nothing matches.
    pub fn lookup(query: &str) -> ArtResult<Self> {
        let query = query.trim();
        CATALOG
            .iter()
            .find(|e| e.native == query || e.name.eq_ignore_ascii_case(query))
            .map(CatalogEntry::to_emoji)
            .ok_or_else(|| ArtError::UnknownEmoji(query.to_string()))
    }

    /// The emoji used when nothing else is selected.
    #[must_use]
    pub fn default_emoji() -> Self {
        CATALOG[0].to_emoji()
    }

    /// Iterate over the built-in catalog.
    #[must_use]
    pub fn catalog() -> impl Iterator<Item = Self> {
        CATALOG.iter().map(CatalogEntry::to_emoji)
    }
}

struct CatalogEntry {
    native: &'static str,
    name: &'static str,
    keywords: &'static [&'static str],
}

impl CatalogEntry {
    fn to_emoji(&self) -> Emoji {
        Emoji::new(self.native, self.name, self.keywords)
    }
}

const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        native: "🐶",
        name: "Dog",
        keywords: &["animal", "friend", "nature", "woof", "puppy", "pet", "faithful"],
    },
    CatalogEntry {
        native: "🐱",
        name: "Cat",
        keywords: &["animal", "meow", "nature", "pet", "kitten"],
    },
    CatalogEntry {
        native: "🦊",
        name: "Fox",
        keywords: &["animal", "nature", "face"],
    },
    CatalogEntry {
        native: "🐼",
        name: "Panda",
        keywords: &["animal", "nature", "panda"],
    },
    CatalogEntry {
        native: "🐸",
        name: "Frog",
        keywords: &["animal", "nature", "croak", "toad"],
    },
    CatalogEntry {
        native: "🦄",
        name: "Unicorn",
        keywords: &["animal", "nature", "mystical"],
    },
    CatalogEntry {
        native: "🐙",
        name: "Octopus",
        keywords: &["animal", "creature", "ocean", "sea", "nature", "beach"],
    },
    CatalogEntry {
        native: "😀",
        name: "Grinning Face",
        keywords: &["smile", "happy", "joy", "grin"],
    },
    CatalogEntry {
        native: "😂",
        name: "Face with Tears of Joy",
        keywords: &["cry", "weep", "happy", "happytears", "haha"],
    },
    CatalogEntry {
        native: "❤️",
        name: "Red Heart",
        keywords: &["love", "like", "valentines"],
    },
    CatalogEntry {
        native: "🍕",
        name: "Pizza",
        keywords: &["food", "party", "italy"],
    },
    CatalogEntry {
        native: "🍔",
        name: "Hamburger",
        keywords: &["meat", "fast food", "beef", "cheeseburger", "mcdonalds", "burger king"],
    },
    CatalogEntry {
        native: "🚀",
        name: "Rocket",
        keywords: &["launch", "ship", "staffmode", "NASA", "outer space", "fly"],
    },
    CatalogEntry {
        native: "🌈",
        name: "Rainbow",
        keywords: &["nature", "happy", "unicorn", "sky", "colors"],
    },
    CatalogEntry {
        native: "🔥",
        name: "Fire",
        keywords: &["hot", "cook", "flame"],
    },
    CatalogEntry {
        native: "🌵",
        name: "Cactus",
        keywords: &["vegetable", "plant", "nature"],
    },
];
