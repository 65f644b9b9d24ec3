//! Server-rendered landing page.
//!
//! The page reflects the option carried by `?share=<key>`: its emoji becomes
//! the favicon, the cached artwork (if any) is shown, and OpenGraph metadata
//! points crawlers at the shared link.

use emojiart_core::{favicon_data_uri, RequestOption, ShareLinkEncoder, SocialNetwork};
use url::Url;

const TEMPLATE: &str = include_str!("../web/index.html");

/// Page title.
pub const TITLE: &str = "J.A.R.V.I.S.";
/// Page description.
pub const DESCRIPTION: &str = "Turn emoji into amazing artwork via AI";
/// OpenGraph image used when no shared artwork is cached.
pub const OG_IMAGE: &str = "https://tryemoji.com/og.png";
const OG_IMAGE_WIDTH: u32 = 630;
const OG_IMAGE_HEIGHT: u32 = 473;

/// Everything the page template needs.
#[derive(Debug, Clone)]
pub struct PageContext<'a> {
    /// Option being displayed.
    pub option: &'a RequestOption,
    /// Image to display.
    pub image: &'a str,
    /// Base URL of share links.
    pub public_url: &'a str,
}

impl PageContext<'_> {
    /// Render the page.
    #[must_use]
    pub fn render(&self) -> String {
        let key = ShareLinkEncoder::encode(self.option);
        let page_url = ShareLinkEncoder::share_url(self.public_url, &key).ok();
        let og_image = if is_absolute_http(self.image) {
            self.image
        } else {
            OG_IMAGE
        };
        let style = self.option.preset().map_or("Custom", |p| p.artist);
        let share_links = page_url.as_ref().map(share_links).unwrap_or_default();
        let option_json = serde_json::to_string(self.option)
            .unwrap_or_else(|_| "{}".to_string())
            .replace('<', "\\u003c");

        let page_url = escape_html(page_url.as_ref().map_or(self.public_url, Url::as_str));
        fill(TEMPLATE, |name| {
            Some(match name {
                "title" => TITLE.to_string(),
                "description" => DESCRIPTION.to_string(),
                "page_url" => page_url.clone(),
                "og_image" => escape_html(og_image),
                "og_image_width" => OG_IMAGE_WIDTH.to_string(),
                "og_image_height" => OG_IMAGE_HEIGHT.to_string(),
                "favicon" => favicon_data_uri(self.option.emoji()),
                "emoji" => escape_html(self.option.emoji()),
                "image" => escape_html(self.image),
                "name" => escape_html(self.option.name()),
                "style" => escape_html(style),
                "strength" => self.option.strength().to_string(),
                "seed" => self.option.seed().to_string(),
                "share_links" => share_links.clone(),
                "option_json" => option_json.clone(),
                _ => return None,
            })
        })
    }
}

fn share_links(page_url: &Url) -> String {
    SocialNetwork::ALL
        .iter()
        .map(|network| {
            format!(
                r#"<a href="{}" target="_blank" rel="noopener">{}</a>"#,
                escape_html(network.intent_url(page_url).as_str()),
                network.label()
            )
        })
        .collect::<Vec<_>>()
        .join("")
}

/// Substitute `{{name}}` placeholders in one left-to-right pass.
///
/// Inserted values are never scanned again. Unknown placeholders are kept as is.
fn fill(template: &str, value: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len() * 2);
    let mut rest = template;
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            rest = &rest[open..];
            break;
        };
        let name = &after[..close];
        match value(name) {
            Some(text) => out.push_str(&text),
            None => {
                out.push_str("{{");
                out.push_str(name);
                out.push_str("}}");
            }
        }
        rest = &after[close + 2..];
    }
    out.push_str(rest);
    out
}

fn is_absolute_http(image: &str) -> bool {
    image.starts_with("https://") || image.starts_with("http://")
}

/// Escape text for HTML element content and quoted attributes.
#[must_use]
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
