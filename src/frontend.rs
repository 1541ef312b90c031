use crate::error::Result;
use crate::AppState;
use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;
use std::sync::Arc;

// Station page and its static assets
#[derive(RustEmbed)]
#[folder = "assets/"]
pub struct Assets;

/// Station page. Loading it keeps the default radio's playlist topped up.
pub async fn index(State(state): State<Arc<AppState>>) -> Result<Response> {
    let radio_id = state.radio_manager.default_radio_id().await?;
    state.radio_manager.maintain(radio_id).await?;

    Ok(match Assets::get("index.html") {
        Some(content) => serve_asset("index.html", content.data.into_owned()),
        None => not_found(),
    })
}

pub async fn serve_asset_route(uri: Uri) -> impl IntoResponse {
    let path = uri.path().trim_start_matches('/');

    match Assets::get(path) {
        Some(content) => serve_asset(path, content.data.into_owned()),
        None => not_found(),
    }
}

fn serve_asset(path: &str, data: Vec<u8>) -> Response {
    let mime = mime_guess::from_path(path).first_or_octet_stream();

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, mime.as_ref().to_string()),
            (header::CACHE_CONTROL, cache_control_value(path).to_string()),
        ],
        Body::from(data),
    )
        .into_response()
}

fn cache_control_value(path: &str) -> &'static str {
    // The page itself must always be revalidated
    if path.ends_with(".html") {
        "public, max-age=0, must-revalidate"
    } else {
        "public, max-age=3600"
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "404 Not Found").into_response()
}
