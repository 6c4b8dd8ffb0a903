//! HTTP client for the remote species catalog.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use serde::Deserialize;

use super::{Candidate, ReferenceDetail};
use crate::errors::AppError;

/// `GET /pokemon?limit=N` response. Every field is optional upstream.
#[derive(Debug, Deserialize)]
struct CandidatePage {
    #[serde(default)]
    results: Vec<CandidateEntry>,
}

#[derive(Debug, Deserialize)]
struct CandidateEntry {
    name: Option<String>,
    url: Option<String>,
}

/// `GET /pokemon/{name}` response, reduced to the sprite fields.
#[derive(Debug, Default, Deserialize)]
struct SpeciesDetail {
    #[serde(default)]
    sprites: Option<Sprites>,
}

#[derive(Debug, Default, Deserialize)]
struct Sprites {
    #[serde(default)]
    front_default: Option<String>,
    #[serde(default)]
    other: Option<OtherSprites>,
}

#[derive(Debug, Default, Deserialize)]
struct OtherSprites {
    #[serde(default, rename = "official-artwork")]
    official_artwork: Option<Artwork>,
}

#[derive(Debug, Default, Deserialize)]
struct Artwork {
    #[serde(default)]
    front_default: Option<String>,
}

impl SpeciesDetail {
    /// Official artwork, else the default front sprite.
    fn artwork_url(self) -> Option<String> {
        let sprites = self.sprites?;
        let official = sprites
            .other
            .and_then(|o| o.official_artwork)
            .and_then(|a| a.front_default)
            .filter(|u| !u.is_empty());
        official.or(sprites.front_default.filter(|u| !u.is_empty()))
    }
}

/// Thin wrapper over the catalog's REST endpoints.
#[derive(Clone)]
pub struct CatalogClient {
    http: Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Fetch up to `limit` candidate names.
    pub async fn list_candidates(&self, limit: usize) -> Result<Vec<Candidate>, AppError> {
        let url = format!("{}/pokemon", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("limit", limit)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Lookup(format!(
                "Candidate list request failed with status {}",
                status
            )));
        }

        let page: CandidatePage = response.json().await?;
        let candidates: Vec<Candidate> = page
            .results
            .into_iter()
            .filter_map(|entry| {
                let name = entry.name.filter(|n| !n.trim().is_empty())?;
                Some(Candidate::new(name, entry.url))
            })
            .take(limit)
            .collect();

        tracing::info!("Fetched {} reference candidates", candidates.len());
        Ok(candidates)
    }

    /// Fetch artwork for one candidate. Any failure yields `None`.
    pub async fn fetch_detail(&self, name: &str) -> Option<ReferenceDetail> {
        let name = name.trim().to_lowercase();
        if name.is_empty() {
            return None;
        }

        let url = match self.detail_url(&name) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Cannot build detail request for {}: {}", name, e);
                return None;
            }
        };
        let response = match self.http.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("Detail request for {} failed: {}", name, e);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(
                "Detail request for {} returned status {}",
                name,
                response.status()
            );
            return None;
        }

        let detail: SpeciesDetail = match response.json().await {
            Ok(d) => d,
            Err(e) => {
                tracing::warn!("Detail response for {} was not understood: {}", name, e);
                return None;
            }
        };

        match detail.artwork_url() {
            Some(artwork_url) => Some(ReferenceDetail { name, artwork_url }),
            None => {
                tracing::warn!("No artwork available for {}", name);
                None
            }
        }
    }

    /// `{base}/pokemon/{name}` with `name` encoded as one path segment.
    fn detail_url(&self, name: &str) -> Result<Url, AppError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| AppError::Config(format!("Invalid catalog URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| AppError::Config(format!("Catalog URL {} has no path", self.base_url)))?
            .pop_if_empty()
            .push("pokemon")
            .push(name);
        Ok(url)
    }

    /// Confirm that `url` serves an image.
    pub async fn preload_image(&self, url: &str) -> Result<(), AppError> {
        if url.starts_with("data:image/") {
            return Ok(());
        }

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Lookup(format!(
                "Image {} returned status {}",
                url, status
            )));
        }

        let is_image = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("image/"));
        if !is_image {
            return Err(AppError::Lookup(format!("{} is not an image", url)));
        }

        Ok(())
    }

    /// `url` when it loads, otherwise `placeholder`.
    pub async fn resolve_image(&self, url: Option<&str>, placeholder: &str) -> String {
        let Some(url) = url.filter(|u| !u.is_empty()) else {
            return placeholder.to_string();
        };

        match self.preload_image(url).await {
            Ok(()) => url.to_string(),
            Err(e) => {
                tracing::warn!("Image loading failed, using placeholder: {}", e);
                placeholder.to_string()
            }
        }
    }
}
