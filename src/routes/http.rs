//! HTTP endpoint handlers: read-only data for the pre-game screen. The game
//! itself is played over the WebSocket.

use std::sync::Arc;
use axum::{extract::State, response::IntoResponse, Json};
use tracing::instrument;

use crate::protocol::{ladder_to_out, CategoriesOut, HealthOut};
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_get_categories(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(CategoriesOut { categories: state.categories() })
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_ladder(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(ladder_to_out(&state.config))
}
