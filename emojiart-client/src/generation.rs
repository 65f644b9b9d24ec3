//! Client for the external image-generation endpoint.
//!
//! The endpoint receives the request option as JSON and answers either with
//! JSON `{"image": "<url or data uri>"}` or with raw `image/*` bytes, which are
//! turned into a base64 `data:` URI.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use emojiart_core::{GeneratedImage, RequestOption};
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{status_error, ClientError};

/// Default request timeout for a single generation.
pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(60);

/// Wire form of a generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Emoji glyph.
    pub emoji: String,
    /// Descriptive label.
    pub name: String,
    /// Style prompt.
    pub prompt: String,
    /// AI strength.
    pub strength: u32,
    /// Generation seed.
    pub seed: u32,
}

impl From<&RequestOption> for GenerationRequest {
    fn from(option: &RequestOption) -> Self {
        Self {
            emoji: option.emoji().to_string(),
            name: option.name().to_string(),
            prompt: option.prompt().to_string(),
            strength: option.strength(),
            seed: option.seed(),
        }
    }
}

impl From<GenerationRequest> for RequestOption {
    fn from(request: GenerationRequest) -> Self {
        RequestOption::new(
            request.emoji,
            request.name,
            request.prompt,
            i64::from(request.strength),
            request.seed,
        )
    }
}

/// JSON body returned by the generation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Image reference.
    #[serde(alias = "url")]
    pub image: String,
}

/// Anything that can turn a request option into an image.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate the image for `option`.
    async fn generate(&self, option: &RequestOption) -> Result<GeneratedImage, ClientError>;
}

/// [`ImageGenerator`] backed by an HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpImageGenerator {
    http: Client,
    endpoint: Url,
}

impl HttpImageGenerator {
    /// Create a generator posting to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if the URL is malformed.
    /// Returns [`ClientError::Http`] if the HTTP client fails to build.
    pub fn new(endpoint: impl AsRef<str>) -> Result<Self, ClientError> {
        Self::with_timeout(endpoint, DEFAULT_GENERATION_TIMEOUT)
    }

    /// Create a generator with a custom per-request timeout.
    ///
    /// # Errors
    ///
    /// See [`Self::new`].
    pub fn with_timeout(endpoint: impl AsRef<str>, timeout: Duration) -> Result<Self, ClientError> {
        let endpoint =
            Url::parse(endpoint.as_ref()).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        let http = Client::builder()
            .user_agent(concat!("emojiart/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { http, endpoint })
    }

    /// The endpoint requests are sent to.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetch the bytes behind an image reference, for saving to disk.
    ///
    /// `data:` URIs are decoded locally; anything else is downloaded.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::UnexpectedResponse`] for undecodable data URIs,
    /// [`ClientError::InvalidUrl`] for references that are not URLs, and
    /// HTTP errors from the download.
    pub async fn download(&self, image: &GeneratedImage) -> Result<Vec<u8>, ClientError> {
        if let Some(bytes) = decode_data_uri(image.as_str()) {
            return bytes;
        }
        let url = self
            .endpoint
            .join(image.as_str())
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        Ok(response.bytes().await?.to_vec())
    }

    /// Download `image` and write it to `path`.
    ///
    /// # Errors
    ///
    /// See [`Self::download`]; also returns [`ClientError::Io`] if the file
    /// cannot be written.
    pub async fn save(
        &self,
        image: &GeneratedImage,
        path: impl AsRef<std::path::Path>,
    ) -> Result<usize, ClientError> {
        let bytes = self.download(image).await?;
        tokio::fs::write(path.as_ref(), &bytes).await?;
        tracing::debug!("Wrote {} bytes to {:?}", bytes.len(), path.as_ref());
        Ok(bytes.len())
    }
}

#[async_trait]
impl ImageGenerator for HttpImageGenerator {
    #[tracing::instrument(name = "generate", skip(self, option), fields(emoji = %option.emoji(), seed = option.seed()))]
    async fn generate(&self, option: &RequestOption) -> Result<GeneratedImage, ClientError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&GenerationRequest::from(option))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_ascii_lowercase());

        match content_type {
            Some(mime) if mime.starts_with("image/") => {
                let bytes = response.bytes().await?;
                if bytes.is_empty() {
                    return Err(ClientError::UnexpectedResponse(
                        "empty image body".to_string(),
                    ));
                }
                tracing::debug!("Received {} bytes of {}", bytes.len(), mime);
                Ok(GeneratedImage::new(format!(
                    "data:{mime};base64,{}",
                    STANDARD.encode(&bytes)
                )))
            }
            _ => {
                let body: GenerationResponse = serde_json::from_slice(&response.bytes().await?)?;
                if body.image.trim().is_empty() {
                    return Err(ClientError::UnexpectedResponse(
                        "response did not contain an image".to_string(),
                    ));
                }
                Ok(GeneratedImage::new(body.image))
            }
        }
    }
}

/// Decode a base64 `data:` URI. Returns `None` if `reference` is not one.
fn decode_data_uri(reference: &str) -> Option<Result<Vec<u8>, ClientError>> {
    let rest = reference.strip_prefix("data:")?;
    let Some((meta, payload)) = rest.split_once(',') else {
        return Some(Err(ClientError::UnexpectedResponse(
            "data URI without payload".to_string(),
        )));
    };
    if !meta.ends_with(";base64") {
        return Some(Ok(payload.as_bytes().to_vec()));
    }
    Some(STANDARD.decode(payload).map_err(|e| {
        ClientError::UnexpectedResponse(format!("invalid base64 in data URI: {e}"))
    }))
}
