//! Role-gated dashboard: statistic cards plus the consultations chart
//! series, with the session's own prescription count folded in.

use axum::extract::State;
use axum::{Extension, Json};
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, SessionContext};
use crate::authorization::Capability;
use crate::services::{ClinicStats, SeriesPoint};

#[derive(Serialize)]
pub struct DashboardResponse {
    pub user_name: String,
    pub role: &'static str,
    pub stats: ClinicStats,
    pub visits_series: Vec<SeriesPoint>,
    /// Prescriptions finalized in this console session.
    pub session_prescriptions: usize,
}

/// `GET /api/dashboard`
pub async fn overview(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionContext>,
) -> Result<Json<DashboardResponse>, ApiError> {
    if !session.role.can(Capability::ViewDashboard) {
        return Err(ApiError::Forbidden);
    }

    let stats = ctx.core.directory.fetch_clinic_stats().await;
    let visits_series = ctx.core.directory.fetch_visits_series().await;
    let session_prescriptions = ctx.core.lock_registry()?.all().len();

    Ok(Json(DashboardResponse {
        user_name: session.user_name,
        role: session.role.as_str(),
        stats,
        visits_series,
        session_prescriptions,
    }))
}
