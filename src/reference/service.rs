//! Cached candidate catalog and artwork resolution.

use std::sync::Arc;

use tokio::sync::RwLock;

use super::{display_name, search_candidates, Candidate, CatalogClient, SelectedReference};
use crate::config::Config;
use crate::errors::AppError;

/// Reference lookups used by the API layer.
pub struct ReferenceService {
    client: CatalogClient,
    catalog_limit: usize,
    page_size: usize,
    placeholder: String,
    candidates: RwLock<Option<Arc<Vec<Candidate>>>>,
}

impl ReferenceService {
    pub fn new(client: CatalogClient, config: &Config) -> Self {
        Self {
            client,
            catalog_limit: config.catalog_limit,
            page_size: config.candidate_page_size,
            placeholder: config.placeholder_image.clone(),
            candidates: RwLock::new(None),
        }
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Fetch the candidate list into the cache.
    pub async fn warm(&self) -> Result<usize, AppError> {
        let fetched = Arc::new(self.client.list_candidates(self.catalog_limit).await?);
        let count = fetched.len();
        *self.candidates.write().await = Some(fetched);
        Ok(count)
    }

    /// Cached candidates, fetching them on first use.
    pub async fn candidates(&self) -> Result<Arc<Vec<Candidate>>, AppError> {
        if let Some(cached) = self.candidates.read().await.as_ref() {
            return Ok(Arc::clone(cached));
        }

        self.warm().await?;
        self.candidates
            .read()
            .await
            .as_ref()
            .map(Arc::clone)
            .ok_or_else(|| AppError::Internal("Candidate cache empty after fetch".to_string()))
    }

    /// Search the cached candidates. `limit` defaults to the page size.
    pub async fn search(&self, term: &str, limit: Option<usize>) -> Result<Vec<Candidate>, AppError> {
        let all = self.candidates().await?;
        Ok(search_candidates(term, &all, limit.unwrap_or(self.page_size)))
    }

    /// Look up artwork for `name` and resolve it to a loadable image.
    ///
    /// Returns `None` when the catalog has no usable detail for the name.
    pub async fn lookup(&self, name: &str) -> Option<SelectedReference> {
        let detail = self.client.fetch_detail(name).await?;
        let image_url = self
            .client
            .resolve_image(Some(&detail.artwork_url), &self.placeholder)
            .await;
        let artwork_url = (image_url == detail.artwork_url).then(|| detail.artwork_url.clone());

        Some(SelectedReference {
            display_name: display_name(&detail.name),
            name: detail.name,
            artwork_url,
            image_url,
        })
    }
}
