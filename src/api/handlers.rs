//! REST API handlers for the lead dashboard
//!
//! These handlers use the shared DashboardService.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::service::{DashboardService, SessionId};
use crate::dashboard::{Dashboard, DetailView};
use crate::session::SessionSummary;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Serialize)]
pub struct SessionCreatedResponse {
    pub session_id: SessionId,
    #[serde(flatten)]
    pub summary: SessionSummary,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Deserialize)]
pub struct SelectionRequest {
    pub sources: Vec<String>,
}

#[derive(Deserialize)]
pub struct ViewRequest {
    pub view: DetailView,
}

pub type AppState = Arc<DashboardService>;

type ApiError = (StatusCode, Json<ErrorResponse>);

fn session_not_found(id: SessionId) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("Session {} not found", id),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /
pub async fn index() -> Html<&'static str> {
    Html(include_str!("../../assets/dashboard.html"))
}

/// GET /api/v1/health
pub async fn health(State(service): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "variant": service.config().variant,
    }))
}

/// POST /api/v1/sessions (body: CSV text)
pub async fn create_session(
    State(service): State<AppState>,
    body: String,
) -> Result<(StatusCode, Json<SessionCreatedResponse>), ApiError> {
    match service.create_session(&body).await {
        Ok((session_id, summary)) => Ok((
            StatusCode::CREATED,
            Json(SessionCreatedResponse { session_id, summary }),
        )),
        Err(e) => Err((StatusCode::BAD_REQUEST, Json(ErrorResponse { error: e.to_string() }))),
    }
}

/// GET /api/v1/sessions/:id
pub async fn get_session(
    State(service): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<SessionSummary>, ApiError> {
    service.summary(id).await.map(Json).ok_or_else(|| session_not_found(id))
}

/// DELETE /api/v1/sessions/:id
pub async fn delete_session(
    State(service): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<StatusCode, ApiError> {
    if service.remove_session(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(session_not_found(id))
    }
}

/// PUT /api/v1/sessions/:id/selection
pub async fn set_selection(
    State(service): State<AppState>,
    Path(id): Path<SessionId>,
    Json(request): Json<SelectionRequest>,
) -> Result<Json<SessionSummary>, ApiError> {
    service
        .set_selection(id, request.sources)
        .await
        .map(Json)
        .ok_or_else(|| session_not_found(id))
}

/// POST /api/v1/sessions/:id/selection/all
pub async fn select_all(
    State(service): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<SessionSummary>, ApiError> {
    service.select_all(id).await.map(Json).ok_or_else(|| session_not_found(id))
}

/// PUT /api/v1/sessions/:id/view
pub async fn set_view(
    State(service): State<AppState>,
    Path(id): Path<SessionId>,
    Json(request): Json<ViewRequest>,
) -> Result<Json<SessionSummary>, ApiError> {
    service
        .set_detail_view(id, request.view)
        .await
        .map(Json)
        .ok_or_else(|| session_not_found(id))
}

/// GET /api/v1/sessions/:id/dashboard
pub async fn get_dashboard(
    State(service): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<Dashboard>, ApiError> {
    service.dashboard(id).await.map(Json).ok_or_else(|| session_not_found(id))
}
