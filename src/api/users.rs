use crate::api::middleware::RequireAuth;
use crate::error::Result;
use crate::models::{UserInfo, Veto};
use crate::services::vetoes;
use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;

pub fn user_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/me/vetoes", get(my_vetoes))
}

async fn list_users(
    State(state): State<Arc<AppState>>,
    RequireAuth(_): RequireAuth,
) -> Result<Json<Vec<UserInfo>>> {
    let users = state.auth_service.users_by_name().await?;
    Ok(Json(users))
}

async fn my_vetoes(
    State(state): State<Arc<AppState>>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Veto>>> {
    let mut conn = state.db.acquire().await?;
    let vetoes = vetoes::for_user(&mut conn, user.id).await?;
    Ok(Json(vetoes))
}
