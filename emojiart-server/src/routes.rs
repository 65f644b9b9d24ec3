//! API route handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
    Json,
};
use emojiart_client::{CachedShare, GenerationRequest, GenerationResponse, WarmRequest};
use emojiart_core::{GeneratedImage, RequestOption, ShareLinkEncoder, DEFAULT_IMAGE};
use serde::Deserialize;

use crate::error::ApiError;
use crate::metrics;
use crate::page::PageContext;
use crate::validation::{validate_image, validate_share_key};
use crate::AppState;

/// Query string of the landing page.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// Share key restoring a previous option.
    pub share: Option<String>,
}

/// Render the landing page for an optional share key.
///
/// Malformed keys render the default option; the page never fails.
#[tracing::instrument(name = "page", skip(state, query), fields(shared = query.share.is_some()))]
pub async fn page_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Html<String> {
    let option = ShareLinkEncoder::decode_or_default(query.share.as_deref());
    let key = ShareLinkEncoder::encode(&option);

    let cached = if query.share.is_some() {
        let cached = state.cache().get(&key);
        metrics::record_share_lookup(cached.is_some());
        cached
    } else {
        None
    };
    metrics::record_page_view(query.share.is_some());

    let image = cached.as_ref().map_or(DEFAULT_IMAGE, GeneratedImage::as_str);
    Html(
        PageContext {
            option: &option,
            image,
            public_url: &state.config.public_url,
        }
        .render(),
    )
}

/// Warm the share cache: `POST /api/share {image, key}`.
#[tracing::instrument(name = "warm_share", skip(state, request))]
pub async fn warm_share_handler(
    State(state): State<AppState>,
    Json(request): Json<WarmRequest>,
) -> Result<StatusCode, ApiError> {
    validate_share_key(&request.key)?;
    validate_image(&request.image)?;

    let inserted = state
        .cache()
        .insert(request.key, GeneratedImage::new(request.image));
    metrics::record_share_warm(state.cache().len());
    tracing::debug!(inserted, "Share cache warmed");
    Ok(StatusCode::NO_CONTENT)
}

/// Look up a cached share: `GET /api/share/{key}`.
#[tracing::instrument(name = "lookup_share", skip(state, key))]
pub async fn lookup_share_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<CachedShare>, ApiError> {
    validate_share_key(&key)?;

    let cached = state.cache().get(&key);
    metrics::record_share_lookup(cached.is_some());
    let image = cached.ok_or(ApiError::NotFound)?;
    Ok(Json(CachedShare {
        key,
        image: image.as_str().to_string(),
    }))
}

/// Generate artwork: `POST /api/generate`.
///
/// A cached image for the option's share key is returned directly;
/// otherwise the upstream generator is called and its result cached.
#[tracing::instrument(
    name = "generate",
    skip(state, request),
    fields(emoji = %request.emoji, seed = request.seed)
)]
pub async fn generate_handler(
    State(state): State<AppState>,
    Json(request): Json<GenerationRequest>,
) -> Result<Json<GenerationResponse>, ApiError> {
    if request.emoji.trim().is_empty() {
        return Err(ApiError::InvalidOption("emoji is empty".to_string()));
    }
    let option = RequestOption::from(request);
    let key = ShareLinkEncoder::encode(&option);

    if let Some(image) = state.cache().get(&key) {
        metrics::record_share_lookup(true);
        metrics::record_generation("cached");
        return Ok(Json(GenerationResponse {
            image: image.as_str().to_string(),
        }));
    }
    metrics::record_share_lookup(false);

    let Some(generator) = state.generator() else {
        metrics::record_generation("unavailable");
        return Err(ApiError::GeneratorUnavailable);
    };

    match generator.generate(&option).await {
        Ok(image) => {
            metrics::record_generation("generated");
            let response = GenerationResponse {
                image: image.as_str().to_string(),
            };
            state.cache().insert(key, image);
            Ok(Json(response))
        }
        Err(err) => {
            metrics::record_generation("failed");
            Err(ApiError::Upstream(err))
        }
    }
}
