use crate::error::{AppError, Result};
use crate::models::{User, UserRole};
use crate::AppState;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::sync::Arc;

/// Logged-in listener, loaded from the bearer token
pub struct RequireAuth(pub User);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self> {
        let token = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(AppError::Unauthorized)?;

        let user = state.auth_service.authenticate(token).await?;

        Ok(RequireAuth(user))
    }
}

/// Role is checked against the stored user, not the token claims
pub struct RequireAdmin(pub User);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self> {
        let RequireAuth(user) = RequireAuth::from_request_parts(parts, state).await?;

        if user.role != UserRole::Admin {
            return Err(AppError::Forbidden);
        }

        Ok(RequireAdmin(user))
    }
}
