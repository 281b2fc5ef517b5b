//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    infrastructure::dto::http::{HealthDto, SlotsSummaryDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
    })
}

/// Current board, same public view the WebSocket clients receive
pub async fn get_slots(State(state): State<Arc<AppState>>) -> Json<SlotsSummaryDto> {
    let snapshot = state.get_slots_usecase.execute().await;
    Json(SlotsSummaryDto::from(snapshot))
}
