//! Collection status endpoint.

use axum::extract::State;
use serde::Serialize;

use super::{success, ApiResult};
use crate::AppState;

/// Summary of the loaded collection.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusInfo {
    pub card_count: usize,
    pub sets: Vec<String>,
    pub storage_key: String,
    /// Why the stored collection could not be loaded at startup, until a save
    /// replaces it
    pub load_error: Option<String>,
}

/// GET /api/status - Collection status.
pub async fn get_status(State(state): State<AppState>) -> ApiResult<StatusInfo> {
    let store = state.store.read().await;

    success(StatusInfo {
        card_count: store.len(),
        sets: store.sets().iter().cloned().collect(),
        storage_key: state.config.storage_key.clone(),
        load_error: store.load_error().map(|e| e.message()),
    })
}
