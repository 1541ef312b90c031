pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod frontend;
pub mod models;
pub mod services;

use crate::config::Config;
use crate::services::{AuthService, Dj, Library, RadioManager};
use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub struct AppState {
    pub db: SqlitePool,
    pub auth_service: Arc<AuthService>,
    pub radio_manager: Arc<RadioManager>,
    pub library: Arc<Library>,
}

impl AppState {
    pub fn new(db: SqlitePool, config: &Config) -> Self {
        Self {
            db: db.clone(),
            auth_service: Arc::new(AuthService::new(db.clone(), config)),
            radio_manager: Arc::new(RadioManager::new(
                db.clone(),
                Dj::from_config(config),
                config.update_interval_secs,
            )),
            library: Arc::new(Library::new(db)),
        }
    }
}

pub fn build_router(state: Arc<AppState>, config: &Config) -> Router {
    Router::new()
        .route("/", get(frontend::index))
        .nest(
            "/api/v1",
            Router::new()
                .nest("/auth", api::auth_routes())
                .merge(api::radio_routes())
                .merge(api::library_routes())
                .merge(api::user_routes()),
        )
        .fallback(get(frontend::serve_asset_route))
        .with_state(state)
        .layer(CompressionLayer::new())
        .layer(cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(
            origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
