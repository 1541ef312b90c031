use crate::api::middleware::RequireAuth;
use crate::error::{AppError, Result};
use crate::models::{AuthResponse, CreateUserRequest, LoginRequest, UserInfo};
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use validator::Validate;

pub fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
}

async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<AuthResponse>> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let response = state.auth_service.register(req).await?;
    Ok(Json(response))
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let response = state.auth_service.login(req).await?;
    Ok(Json(response))
}

async fn me(RequireAuth(user): RequireAuth) -> Json<UserInfo> {
    Json(user.into())
}
