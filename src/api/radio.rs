use crate::api::middleware::{RequireAdmin, RequireAuth};
use crate::error::{AppError, Result};
use crate::models::{
    ActionStatus, CreateRadioRequest, Radio, RadioAction, UpdateData, UpdateSections,
};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

pub fn radio_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/radios", get(list_radios).post(create_radio))
        .route("/radios/:id/update", get(update))
        .route("/radios/:id/play", get(play).post(play))
        .route("/radios/:id/pause", get(pause).post(pause))
        .route("/radios/:id/veto", get(veto).post(veto))
}

#[derive(Debug, Deserialize)]
struct UpdateQuery {
    request: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TrackQuery {
    track: i64,
}

async fn list_radios(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Radio>>> {
    let radios = state.radio_manager.list_radios().await?;
    Ok(Json(radios))
}

async fn create_radio(
    State(state): State<Arc<AppState>>,
    RequireAdmin(_): RequireAdmin,
    Json(req): Json<CreateRadioRequest>,
) -> Result<Json<Radio>> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let radio = state.radio_manager.create_radio(req.name.trim()).await?;
    Ok(Json(radio))
}

async fn update(
    State(state): State<Arc<AppState>>,
    RequireAuth(_): RequireAuth,
    Path(id): Path<i64>,
    Query(query): Query<UpdateQuery>,
) -> Result<Json<UpdateData>> {
    let sections = UpdateSections::parse(query.request.as_deref().unwrap_or("all"))?;
    let data = state.radio_manager.update(id, sections).await?;
    Ok(Json(data))
}

async fn play(
    State(state): State<Arc<AppState>>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i64>,
    Query(query): Query<TrackQuery>,
) -> Result<(StatusCode, Json<UpdateData>)> {
    perform(&state, id, user.id, RadioAction::Play, query.track).await
}

async fn pause(
    State(state): State<Arc<AppState>>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i64>,
    Query(query): Query<TrackQuery>,
) -> Result<(StatusCode, Json<UpdateData>)> {
    perform(&state, id, user.id, RadioAction::Pause, query.track).await
}

async fn veto(
    State(state): State<Arc<AppState>>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i64>,
    Query(query): Query<TrackQuery>,
) -> Result<(StatusCode, Json<UpdateData>)> {
    perform(&state, id, user.id, RadioAction::Veto, query.track).await
}

async fn perform(
    state: &AppState,
    radio_id: i64,
    user_id: uuid::Uuid,
    action: RadioAction,
    track_id: i64,
) -> Result<(StatusCode, Json<UpdateData>)> {
    let outcome = state
        .radio_manager
        .perform(radio_id, user_id, action, track_id)
        .await?;

    tracing::debug!(
        radio_id,
        ?action,
        track = ?outcome.track.as_ref().map(|t| t.id),
        status = ?outcome.status,
        "Radio action handled"
    );

    // A stale track is a resync hint, not a failure
    let status = match outcome.status {
        ActionStatus::Applied => StatusCode::OK,
        ActionStatus::Stale => StatusCode::NOT_ACCEPTABLE,
    };

    Ok((status, Json(outcome.data)))
}
