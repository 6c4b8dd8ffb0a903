//! Card API endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{Card, CreateCardRequest, UpdateCardRequest};
use crate::query::{CardFilter, FilterParams};
use crate::view::{render_collection, render_detail, CardDetailView, CollectionView};
use crate::AppState;

/// A card together with its rendered detail view.
#[derive(Debug, Serialize)]
pub struct CardResponse {
    pub card: Card,
    pub view: CardDetailView,
}

impl CardResponse {
    fn new(card: Card, placeholder: &str) -> Self {
        let view = render_detail(&card, placeholder);
        Self { card, view }
    }
}

/// GET /api/cards - Filtered collection view.
pub async fn list_cards(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> ApiResult<CollectionView> {
    let filter = CardFilter::try_from(params)?;
    let store = state.store.read().await;

    success(render_collection(
        store.list(),
        &filter,
        store.sets(),
        &state.config.placeholder_image,
    ))
}

/// GET /api/cards/{id} - Get a single card.
pub async fn get_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<CardResponse> {
    let store = state.store.read().await;
    let card = store
        .get(&id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Card {} not found", id)))?;

    success(CardResponse::new(card, &state.config.placeholder_image))
}

/// POST /api/cards - Create a card, using the selected reference if there is one.
pub async fn create_card(
    State(state): State<AppState>,
    Json(mut request): Json<CreateCardRequest>,
) -> ApiResult<CardResponse> {
    // One create consumes the selection.
    let taken = state.selection.lock().await.take();
    if let Some((_, reference)) = &taken {
        if request.name.trim().is_empty() {
            request.name = reference.display_name.clone();
        }
        if let Some(artwork) = &reference.artwork_url {
            request.image = Some(artwork.clone());
        }
    }

    let result = state.store.write().await.create(&request).await;

    // The card exists in memory once validation passed, even if saving failed.
    if let (Some((ticket, reference)), Err(AppError::Validation(_))) = (taken, &result) {
        if !state.selection.lock().await.restore(&ticket, reference) {
            tracing::debug!("Selection changed while the card was rejected; not restoring");
        }
    }

    let card = result?;
    success(CardResponse::new(card, &state.config.placeholder_image))
}

/// PUT /api/cards/{id} - Update a card.
pub async fn update_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateCardRequest>,
) -> ApiResult<CardResponse> {
    let card = state.store.write().await.update(&id, &request).await?;
    success(CardResponse::new(card, &state.config.placeholder_image))
}

/// DELETE /api/cards/{id} - Delete a card.
pub async fn delete_card(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Card> {
    let card = state.store.write().await.delete(&id).await?;
    success(card)
}

/// GET /api/sets - Distinct set names for the set filter.
pub async fn list_sets(State(state): State<AppState>) -> ApiResult<Vec<String>> {
    let store = state.store.read().await;
    success(store.sets().iter().cloned().collect())
}
