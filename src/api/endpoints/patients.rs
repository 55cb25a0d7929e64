//! Patient directory endpoints.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, SessionContext};
use crate::authorization::Capability;
use crate::models::PatientInfo;

#[derive(Serialize)]
pub struct PatientsResponse {
    pub patients: Vec<PatientInfo>,
}

/// `GET /api/patients`
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionContext>,
) -> Result<Json<PatientsResponse>, ApiError> {
    if !session.role.can(Capability::ManagePatients) {
        return Err(ApiError::Forbidden);
    }
    let patients = ctx.core.directory.fetch_patients().await;
    Ok(Json(PatientsResponse { patients }))
}

/// `GET /api/patients/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionContext>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<PatientInfo>, ApiError> {
    if !session.role.can(Capability::ManagePatients) {
        return Err(ApiError::Forbidden);
    }
    ctx.core
        .directory
        .find_patient(patient_id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Patient {patient_id} inconnu")))
}
