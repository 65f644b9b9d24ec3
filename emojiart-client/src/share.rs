//! Client for the share/caching endpoint.
//!
//! Before a share link is handed out, the current image is "warmed" into the
//! endpoint's cache under the link's share key so recipients get the image
//! without waiting for a new generation.

use emojiart_core::{GeneratedImage, SocialNetwork};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{status_error, ClientError};

/// Body of a warm call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarmRequest {
    /// Image reference to cache.
    pub image: String,
    /// Share key the image belongs to.
    pub key: String,
}

/// Body returned by a cache lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedShare {
    /// Share key.
    pub key: String,
    /// Cached image reference.
    pub image: String,
}

/// A share link ready to hand out.
#[derive(Debug, Clone)]
pub struct ShareLink {
    /// Page URL carrying the share key.
    pub url: Url,
    /// The share key.
    pub key: String,
    /// Share intents per social network.
    pub intents: Vec<(SocialNetwork, Url)>,
}

impl ShareLink {
    /// Build a link and its social intents.
    #[must_use]
    pub fn new(url: Url, key: impl Into<String>) -> Self {
        let intents = SocialNetwork::ALL
            .iter()
            .map(|network| (*network, network.intent_url(&url)))
            .collect();
        Self {
            url,
            key: key.into(),
            intents,
        }
    }
}

/// HTTP client for the share endpoint (`/api/share`).
#[derive(Debug, Clone)]
pub struct ShareClient {
    http: Client,
    endpoint: Url,
}

impl ShareClient {
    /// Create a client for `endpoint`.
    ///
    /// `endpoint` may be the share endpoint itself (`https://host/api/share`)
    /// or just the host, in which case `/api/share` is appended.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if the URL is malformed or cannot
    /// carry path segments, and [`ClientError::Http`] if the HTTP client fails
    /// to build.
    pub fn new(endpoint: impl AsRef<str>) -> Result<Self, ClientError> {
        let mut endpoint =
            Url::parse(endpoint.as_ref()).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        if endpoint.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(format!(
                "{endpoint} cannot carry a path"
            )));
        }
        if endpoint.path().is_empty() || endpoint.path() == "/" {
            endpoint.set_path("/api/share");
        }
        let http = Client::builder()
            .user_agent(concat!("emojiart/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, endpoint })
    }

    /// The share endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Cache `image` under `key`. An empty image is skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] or [`ClientError::Status`] if the
    /// endpoint could not store the image.
    #[tracing::instrument(name = "warm_share", skip(self, image))]
    pub async fn warm(&self, image: &str, key: &str) -> Result<(), ClientError> {
        if image.is_empty() {
            tracing::debug!("No image to warm");
            return Ok(());
        }
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&WarmRequest {
                image: image.to_string(),
                key: key.to_string(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        tracing::debug!("Share cache warmed");
        Ok(())
    }

    /// Look up a cached image for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`], [`ClientError::Status`] for statuses
    /// other than 200/404, or [`ClientError::Json`] for malformed bodies.
    #[tracing::instrument(name = "lookup_share", skip(self))]
    pub async fn lookup(&self, key: &str) -> Result<Option<GeneratedImage>, ClientError> {
        let url = self.key_url(key)?;
        let response = self.http.get(url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let cached: CachedShare = response.json().await?;
                if cached.image.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(GeneratedImage::new(cached.image)))
                }
            }
            _ => Err(status_error(response).await),
        }
    }

    fn key_url(&self, key: &str) -> Result<Url, ClientError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(self.endpoint.to_string()))?
            .pop_if_empty()
            .push(key);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ShareClient {
        ShareClient::new(server.uri()).expect("client")
    }

    #[test]
    fn test_host_only_endpoint_gets_default_path() {
        let client = ShareClient::new("http://localhost:9474").expect("client");
        assert_eq!(client.endpoint().path(), "/api/share");

        let explicit = ShareClient::new("http://localhost:9474/custom/share").expect("client");
        assert_eq!(explicit.endpoint().path(), "/custom/share");
    }

    #[test]
    fn test_key_url_escapes_key() {
        let client = ShareClient::new("http://localhost:9474/api/share/").expect("client");
        let url = client.key_url("abc/def").expect("url");
        assert_eq!(url.path(), "/api/share/abc%2Fdef");
    }

    #[test]
    fn test_share_link_has_all_intents() {
        let url = Url::parse("https://example.com/?share=k").expect("url");
        let link = ShareLink::new(url, "k");
        assert_eq!(link.intents.len(), SocialNetwork::ALL.len());
    }

    #[tokio::test]
    #[cfg_attr(
        target_os = "macos",
        ignore = "wiremock/reqwest system-configuration issue on macOS"
    )]
    async fn warm_posts_image_and_key() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/share"))
            .and(body_json(json!({ "image": "https://cdn/x.png", "key": "abc" })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .warm("https://cdn/x.png", "abc")
            .await
            .expect("warm");
    }

    #[tokio::test]
    #[cfg_attr(
        target_os = "macos",
        ignore = "wiremock/reqwest system-configuration issue on macOS"
    )]
    async fn warm_skips_empty_image() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;

        client_for(&server).warm("", "abc").await.expect("skip");
    }

    #[tokio::test]
    #[cfg_attr(
        target_os = "macos",
        ignore = "wiremock/reqwest system-configuration issue on macOS"
    )]
    async fn warm_failure_is_reported() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(413).set_body_string("too large"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .warm("data:image/png;base64,AAAA", "abc")
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Status { status: 413, .. }));
    }

    #[tokio::test]
    #[cfg_attr(
        target_os = "macos",
        ignore = "wiremock/reqwest system-configuration issue on macOS"
    )]
    async fn lookup_hit_and_miss() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/share/hit"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "key": "hit", "image": "https://cdn/hit.png" })),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/share/miss"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let hit = client.lookup("hit").await.expect("lookup");
        assert_eq!(hit.as_ref().map(GeneratedImage::as_str), Some("https://cdn/hit.png"));
        assert!(client.lookup("miss").await.expect("lookup").is_none());
    }
}
