use crate::api::middleware::{RequireAdmin, RequireAuth};
use crate::error::{AppError, Result};
use crate::models::{CreateTrackRequest, Track};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

pub fn library_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tracks", get(list_tracks).post(add_track))
        .route("/tracks/:id", get(get_track))
}

#[derive(Debug, Deserialize)]
struct ListTracksQuery {
    limit: Option<i64>,
    offset: Option<i64>,
}

#[derive(Debug, Serialize)]
struct ListTracksResponse {
    tracks: Vec<Track>,
    total: i64,
}

async fn list_tracks(
    State(state): State<Arc<AppState>>,
    RequireAuth(_): RequireAuth,
    Query(query): Query<ListTracksQuery>,
) -> Result<Json<ListTracksResponse>> {
    let limit = query.limit.unwrap_or(50).clamp(1, 500);
    let offset = query.offset.unwrap_or(0).max(0);

    let (tracks, total) = state.library.list_tracks(limit, offset).await?;
    Ok(Json(ListTracksResponse { tracks, total }))
}

async fn get_track(
    State(state): State<Arc<AppState>>,
    RequireAuth(_): RequireAuth,
    Path(id): Path<i64>,
) -> Result<Json<Track>> {
    let track = state.library.get_track(id).await?;
    Ok(Json(track))
}

async fn add_track(
    State(state): State<Arc<AppState>>,
    RequireAdmin(_): RequireAdmin,
    Json(req): Json<CreateTrackRequest>,
) -> Result<Json<Track>> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let track = state.library.add_track(req).await?;
    Ok(Json(track))
}
