//! Reference lookup API endpoints.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{success, ApiResult};
use crate::reference::{Candidate, SelectedReference};
use crate::AppState;

/// Maximum number of candidates returned by one search.
const MAX_CANDIDATE_LIMIT: usize = 100;

/// Candidate search query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct CandidateQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Request body for choosing a reference.
#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    #[serde(default)]
    pub name: String,
}

/// The selected reference and the image to preview.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionResponse {
    pub selection: Option<SelectedReference>,
    pub image_url: String,
    /// False when a newer selection superseded this lookup
    pub applied: bool,
}

impl SelectionResponse {
    fn new(selection: Option<SelectedReference>, placeholder: &str, applied: bool) -> Self {
        let image_url = selection
            .as_ref()
            .map(|s| s.image_url.clone())
            .unwrap_or_else(|| placeholder.to_string());
        Self {
            selection,
            image_url,
            applied,
        }
    }
}

/// GET /api/reference/candidates - Search reference candidates by name.
pub async fn search_candidates(
    State(state): State<AppState>,
    Query(params): Query<CandidateQuery>,
) -> ApiResult<Vec<Candidate>> {
    let limit = params.limit.map(|l| l.min(MAX_CANDIDATE_LIMIT));
    let term = params.q.unwrap_or_default();

    let candidates = state.reference.search(&term, limit).await?;
    success(candidates)
}

/// GET /api/reference/selection - Current selected reference.
pub async fn get_selection(State(state): State<AppState>) -> ApiResult<SelectionResponse> {
    let current = state.selection.lock().await.current().cloned();
    success(SelectionResponse::new(
        current,
        state.reference.placeholder(),
        true,
    ))
}

/// PUT /api/reference/selection - Select a reference and fetch its artwork.
pub async fn select_reference(
    State(state): State<AppState>,
    Json(request): Json<SelectRequest>,
) -> ApiResult<SelectionResponse> {
    let name = request.name.trim();
    if name.is_empty() {
        state.selection.lock().await.clear();
        return success(SelectionResponse::new(
            None,
            state.reference.placeholder(),
            true,
        ));
    }

    let ticket = state.selection.lock().await.begin();
    let found = state.reference.lookup(name).await;
    if found.is_none() {
        tracing::warn!("No reference artwork for {}", name);
    }

    let applied = state
        .selection
        .lock()
        .await
        .complete(&ticket, found.clone());

    success(SelectionResponse::new(
        found,
        state.reference.placeholder(),
        applied,
    ))
}

/// DELETE /api/reference/selection - Clear the selected reference.
pub async fn clear_selection(State(state): State<AppState>) -> ApiResult<SelectionResponse> {
    state.selection.lock().await.clear();
    success(SelectionResponse::new(
        None,
        state.reference.placeholder(),
        true,
    ))
}
