//! Session endpoints.
//!
//! `POST /api/auth/login` exchanges an email/password pair from the fixed
//! credential table for a bearer token; `POST /api/auth/logout` revokes it.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::auth::AuthError;
use crate::authorization::{NavEntry, Role};

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user_name: String,
    pub role: Role,
    pub navigation: Vec<NavEntry>,
}

/// `POST /api/auth/login`
pub async fn login(
    State(ctx): State<ApiContext>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (token, session) = {
        let mut sessions = ctx.core.lock_sessions()?;
        sessions
            .login(&body.email, &body.password)
            .map_err(|err| match err {
                AuthError::InvalidCredentials => ApiError::Unauthorized,
                AuthError::Persist(e) => ApiError::Internal(e.to_string()),
            })?
    };

    tracing::info!(email = %session.email, role = session.role.as_str(), "console login");

    Ok(Json(LoginResponse {
        token,
        user_name: session.user_name,
        role: session.role,
        navigation: session.role.navigation(),
    }))
}

#[derive(Serialize)]
pub struct LogoutResponse {
    pub revoked: bool,
}

/// `POST /api/auth/logout`
pub async fn logout(
    State(ctx): State<ApiContext>,
    headers: HeaderMap,
) -> Result<Json<LogoutResponse>, ApiError> {
    let token = headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized)?;

    let revoked = {
        let mut sessions = ctx.core.lock_sessions()?;
        sessions
            .logout(token)
            .map_err(|e| ApiError::Internal(e.to_string()))?
    };

    Ok(Json(LogoutResponse { revoked }))
}
