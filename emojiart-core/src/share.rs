//! Share links.
//!
//! A [`RequestOption`] is packed into a compact key that travels in the
//! `share` query parameter of the page URL:
//!
//! ```text
//! {"e":"🐶","n":"super cute Dog, ...","p":0,"s":550,"d":0}
//!   -> base64 (URL-safe, unpadded)
//!   -> https://host/?share=eyJlIjoi8J-QtiIs...
//! ```
//!
//! `p` is the catalog index when the prompt belongs to a preset, otherwise the
//! prompt text itself.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::option::{MAX_EMOJI_CHARS, MAX_TEXT_CHARS, SEED_SPACE, STRENGTH_RANGE};
use crate::{ArtError, ArtResult, ArtStylePreset, RequestOption};

/// Query parameter carrying the share key.
pub const SHARE_PARAM: &str = "share";

/// Public page that share links point at.
pub const DEFAULT_SHARE_BASE: &str = "https://jarvis-emojiart.netlify.app/";

/// Upper bound on accepted share key length.
pub const MAX_SHARE_KEY_LEN: usize = 12 * 1024;

/// Longest JSON payload an option can produce: every character escaped as
/// `\uXXXX`, plus keys, numbers and punctuation.
const MAX_PAYLOAD_LEN: usize = 64 + 6 * (MAX_EMOJI_CHARS + 2 * MAX_TEXT_CHARS);

// Every encoded option must fit in an accepted key.
const _: () = assert!(MAX_PAYLOAD_LEN.div_ceil(3) * 4 <= MAX_SHARE_KEY_LEN);

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum PromptRef {
    Preset(usize),
    Text(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct SharePayload {
    #[serde(rename = "e")]
    emoji: String,
    #[serde(rename = "n")]
    name: String,
    #[serde(rename = "p")]
    prompt: PromptRef,
    #[serde(rename = "s")]
    strength: u32,
    #[serde(rename = "d")]
    seed: u32,
}

/// Encodes request options into share keys and back.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShareLinkEncoder;

impl ShareLinkEncoder {
    /// Encode an option as a URL-safe share key.
    #[must_use]
    pub fn encode(option: &RequestOption) -> String {
        let prompt = match ArtStylePreset::index_of_prompt(option.prompt()) {
            Some(index) => PromptRef::Preset(index),
            None => PromptRef::Text(option.prompt().to_string()),
        };
        let payload = SharePayload {
            emoji: option.emoji().to_string(),
            name: option.name().to_string(),
            prompt,
            strength: option.strength(),
            seed: option.seed(),
        };
        // A struct of strings and integers always serializes.
        let json = serde_json::to_vec(&payload).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    /// Decode a share key.
    ///
    /// # Errors
    ///
    /// Returns [`ArtError::MalformedShareKey`] if the key is not base64 JSON of
    /// the expected shape, and [`ArtError::InvalidShareOption`] if it decodes
    /// to values no option can hold.
    pub fn decode(key: &str) -> ArtResult<RequestOption> {
        let key = key.trim();
        if key.is_empty() {
            return Err(ArtError::MalformedShareKey("empty key".to_string()));
        }
        if key.len() > MAX_SHARE_KEY_LEN {
            return Err(ArtError::MalformedShareKey(format!(
                "key longer than {MAX_SHARE_KEY_LEN} bytes"
            )));
        }

        let bytes = URL_SAFE_NO_PAD
            .decode(key.trim_end_matches('='))
            .map_err(|e| ArtError::MalformedShareKey(e.to_string()))?;
        let payload: SharePayload = serde_json::from_slice(&bytes)
            .map_err(|e| ArtError::MalformedShareKey(e.to_string()))?;

        if payload.emoji.trim().is_empty() {
            return Err(ArtError::InvalidShareOption("empty emoji".to_string()));
        }
        if !STRENGTH_RANGE.contains(payload.strength) {
            return Err(ArtError::InvalidShareOption(format!(
                "strength {} outside {}..={} step {}",
                payload.strength, STRENGTH_RANGE.min, STRENGTH_RANGE.max, STRENGTH_RANGE.step
            )));
        }
        if payload.seed >= SEED_SPACE {
            return Err(ArtError::InvalidShareOption(format!(
                "seed {} outside seed space",
                payload.seed
            )));
        }
        let prompt = match payload.prompt {
            PromptRef::Preset(index) => ArtStylePreset::by_index(index)
                .ok_or_else(|| {
                    ArtError::InvalidShareOption(format!("no art style at index {index}"))
                })?
                .prompt
                .to_string(),
            PromptRef::Text(text) => text,
        };

        Ok(RequestOption::new(
            payload.emoji,
            payload.name,
            prompt,
            i64::from(payload.strength),
            payload.seed,
        ))
    }

    /// Decode a share key, falling back to the default option when the key is
    /// missing or unusable.
    #[must_use]
    pub fn decode_or_default(key: Option<&str>) -> RequestOption {
        match key {
            None => RequestOption::default(),
            Some(key) => Self::decode(key).unwrap_or_else(|err| {
                tracing::warn!("Ignoring share key: {}", err);
                RequestOption::default()
            }),
        }
    }

    /// Page URL carrying `key` in the share parameter.
    ///
    /// # Errors
    ///
    /// Returns [`ArtError::InvalidUrl`] if `base` is not an absolute URL.
    pub fn share_url(base: &str, key: &str) -> ArtResult<Url> {
        let mut url = Url::parse(base)?;
        url.query_pairs_mut()
            .clear()
            .append_pair(SHARE_PARAM, key);
        Ok(url)
    }

    /// Extract the share key from a page URL's query string.
    #[must_use]
    pub fn key_from_url(url: &Url) -> Option<String> {
        url.query_pairs()
            .find(|(k, _)| k == SHARE_PARAM)
            .map(|(_, v)| v.into_owned())
            .filter(|v| !v.is_empty())
    }
}

/// Social networks with share intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialNetwork {
    /// Facebook sharer.
    Facebook,
    /// X (formerly Twitter) post intent.
    X,
    /// LinkedIn share-offsite.
    LinkedIn,
}

impl SocialNetwork {
    /// All supported networks in display order.
    pub const ALL: [Self; 3] = [Self::Facebook, Self::X, Self::LinkedIn];

    /// Display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Facebook => "Facebook",
            Self::X => "X",
            Self::LinkedIn => "LinkedIn",
        }
    }

    /// Share-intent URL for `share_url`.
    #[must_use]
    pub fn intent_url(self, share_url: &Url) -> Url {
        let (base, param) = match self {
            Self::Facebook => ("https://www.facebook.com/sharer/sharer.php", "u"),
            Self::X => ("https://twitter.com/intent/tweet", "url"),
            Self::LinkedIn => ("https://www.linkedin.com/sharing/share-offsite/", "url"),
        };
        let mut intent = Url::parse(base).unwrap_or_else(|_| share_url.clone());
        intent
            .query_pairs_mut()
            .append_pair(param, share_url.as_str());
        intent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Emoji;

    #[test]
    fn test_round_trip_default() {
        let option = RequestOption::default();
        let key = ShareLinkEncoder::encode(&option);
        assert_eq!(ShareLinkEncoder::decode(&key).expect("decodes"), option);
    }

    #[test]
    fn test_key_is_url_safe() {
        let option = RequestOption::for_emoji(
            &Emoji::lookup("🚀").expect("rocket"),
            ArtStylePreset::by_artist("Lego").expect("lego"),
            640,
            2_159_231,
        );
        let key = ShareLinkEncoder::encode(&option);
        assert!(key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_preset_prompt_encoded_as_index() {
        let option = RequestOption::default();
        let key = ShareLinkEncoder::encode(&option);
        let json = URL_SAFE_NO_PAD.decode(key).expect("base64");
        let value: serde_json::Value = serde_json::from_slice(&json).expect("json");
        assert_eq!(value["p"], 0);
    }

    #[test]
    fn test_custom_prompt_round_trips() {
        let option = RequestOption::new("🐸", "Frog", "charcoal sketch", 480, 9);
        let key = ShareLinkEncoder::encode(&option);
        let decoded = ShareLinkEncoder::decode(&key).expect("decodes");
        assert_eq!(decoded.prompt(), "charcoal sketch");
        assert_eq!(decoded, option);
    }

    #[test]
    fn test_longest_option_fits_in_key() {
        // Control characters are escaped as \u00XX, the worst case per char.
        let text = "\u{1}".repeat(MAX_TEXT_CHARS);
        let option = RequestOption::new("\u{2}".repeat(MAX_EMOJI_CHARS), text.clone(), text, 700, SEED_SPACE - 1);
        let key = ShareLinkEncoder::encode(&option);
        assert!(key.len() <= MAX_SHARE_KEY_LEN, "key is {} bytes", key.len());
        assert_eq!(ShareLinkEncoder::decode(&key).expect("decodes"), option);
    }

    #[test]
    fn test_padded_key_accepted() {
        let key = ShareLinkEncoder::encode(&RequestOption::default());
        let padded = format!("{key}==");
        assert!(ShareLinkEncoder::decode(&padded).is_ok());
    }

    #[test]
    fn test_garbage_is_malformed() {
        assert!(matches!(
            ShareLinkEncoder::decode("not base64 !!"),
            Err(ArtError::MalformedShareKey(_))
        ));
        let not_json = URL_SAFE_NO_PAD.encode("hello");
        assert!(matches!(
            ShareLinkEncoder::decode(&not_json),
            Err(ArtError::MalformedShareKey(_))
        ));
        assert!(matches!(
            ShareLinkEncoder::decode(""),
            Err(ArtError::MalformedShareKey(_))
        ));
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let encode = |json: &str| URL_SAFE_NO_PAD.encode(json);
        let strength = encode(r#"{"e":"🐶","n":"Dog","p":0,"s":9999,"d":0}"#);
        let off_step = encode(r#"{"e":"🐶","n":"Dog","p":0,"s":405,"d":0}"#);
        let seed = encode(r#"{"e":"🐶","n":"Dog","p":0,"s":550,"d":2159232}"#);
        let preset = encode(r#"{"e":"🐶","n":"Dog","p":99,"s":550,"d":0}"#);
        let emoji = encode(r#"{"e":"","n":"Dog","p":0,"s":550,"d":0}"#);
        let blank = encode(r#"{"e":" ","n":"Dog","p":0,"s":550,"d":0}"#);
        for key in [strength, off_step, seed, preset, emoji, blank] {
            assert!(matches!(
                ShareLinkEncoder::decode(&key),
                Err(ArtError::InvalidShareOption(_))
            ));
        }
    }

    #[test]
    fn test_decode_or_default_falls_back() {
        assert_eq!(
            ShareLinkEncoder::decode_or_default(Some("%%%")),
            RequestOption::default()
        );
        assert_eq!(
            ShareLinkEncoder::decode_or_default(None),
            RequestOption::default()
        );
    }

    #[test]
    fn test_share_url_round_trip() {
        let key = ShareLinkEncoder::encode(&RequestOption::default());
        let url = ShareLinkEncoder::share_url(DEFAULT_SHARE_BASE, &key).expect("valid base");
        assert!(url.as_str().starts_with("https://jarvis-emojiart.netlify.app/?share="));
        assert_eq!(ShareLinkEncoder::key_from_url(&url), Some(key));
    }

    #[test]
    fn test_share_url_replaces_existing_query() {
        let url = ShareLinkEncoder::share_url("http://localhost:9474/?share=old&x=1", "new")
            .expect("valid base");
        assert_eq!(url.query(), Some("share=new"));
    }

    #[test]
    fn test_social_intents_embed_share_url() {
        let share = Url::parse("https://example.com/?share=abc").expect("url");
        for network in SocialNetwork::ALL {
            let intent = network.intent_url(&share);
            let embedded = intent
                .query_pairs()
                .map(|(_, v)| v.into_owned())
                .next()
                .expect("one parameter");
            assert_eq!(embedded, share.as_str(), "{}", network.label());
        }
    }
}
