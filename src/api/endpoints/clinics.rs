//! Clinic directory endpoints (Super User area).

use axum::extract::State;
use axum::{Extension, Json};
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, SessionContext};
use crate::authorization::Capability;
use crate::models::Clinic;

#[derive(Serialize)]
pub struct ClinicsResponse {
    pub clinics: Vec<Clinic>,
}

/// `GET /api/clinics`
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionContext>,
) -> Result<Json<ClinicsResponse>, ApiError> {
    if !session.role.can(Capability::ManageClinics) {
        return Err(ApiError::Forbidden);
    }
    let clinics = ctx.core.directory.fetch_clinics().await;
    Ok(Json(ClinicsResponse { clinics }))
}
