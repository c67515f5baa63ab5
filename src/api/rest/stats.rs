//! Hub statistics endpoint

use std::sync::Arc;

use axum::{extract::State, Json};

use super::ApiError;
use crate::api::websocket::state::AppState;
use crate::hub::HubStats;

/// GET /api/hub/stats - Current size of the active set and lifetime counters
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Result<Json<HubStats>, ApiError> {
    let stats = state.hub.stats().await?;
    Ok(Json(stats))
}
