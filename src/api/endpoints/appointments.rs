//! Appointment schedule endpoints.

use axum::extract::State;
use axum::{Extension, Json};
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, SessionContext};
use crate::authorization::Capability;
use crate::models::Appointment;

#[derive(Serialize)]
pub struct AppointmentsResponse {
    pub appointments: Vec<Appointment>,
}

/// `GET /api/appointments`
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionContext>,
) -> Result<Json<AppointmentsResponse>, ApiError> {
    if !session.role.can(Capability::ManageAppointments) {
        return Err(ApiError::Forbidden);
    }
    let appointments = ctx.core.directory.fetch_appointments().await;
    Ok(Json(AppointmentsResponse { appointments }))
}
