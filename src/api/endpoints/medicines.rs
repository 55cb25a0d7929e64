//! Pharmacy catalog endpoints.

use axum::extract::{Query, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, SessionContext};
use crate::authorization::Capability;
use crate::models::Medicine;

#[derive(Deserialize)]
pub struct MedicineQuery {
    pub search: Option<String>,
    pub low_stock: Option<bool>,
}

#[derive(Serialize)]
pub struct MedicinesResponse {
    pub medicines: Vec<Medicine>,
}

/// `GET /api/medicines`
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionContext>,
    Query(query): Query<MedicineQuery>,
) -> Result<Json<MedicinesResponse>, ApiError> {
    if !session.role.can(Capability::ManageMedicines) {
        return Err(ApiError::Forbidden);
    }

    let mut medicines = ctx.core.directory.fetch_medicines().await;
    if let Some(needle) = query.search.as_deref().map(str::to_lowercase) {
        medicines.retain(|m| {
            m.name.to_lowercase().contains(&needle)
                || m.generic_name
                    .as_deref()
                    .is_some_and(|g| g.to_lowercase().contains(&needle))
        });
    }
    if query.low_stock.unwrap_or(false) {
        medicines.retain(Medicine::is_low_stock);
    }

    Ok(Json(MedicinesResponse { medicines }))
}
