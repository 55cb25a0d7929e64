//! Prescription authoring endpoints.
//!
//! `POST /api/prescriptions` runs the full finalization path: capability
//! check, double-submission guard, precondition validation (patient,
//! medication list, signature), then the registry build. The document
//! endpoint renders the PDF on demand and serves it under the
//! deterministic download name.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use base64::Engine;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, SessionContext};
use crate::authorization::Capability;
use crate::models::enums::DispensingForm;
use crate::models::prescription::Prescription;
use crate::ordonnance::{self, OrderBuilder, PrescriptionForm};

#[derive(Deserialize)]
pub struct MedicationEntry {
    pub name: String,
    pub generic_name: Option<String>,
    pub dosage: String,
    #[serde(default = "default_form")]
    pub form: DispensingForm,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default = "default_unit")]
    pub unit: String,
    pub posology: String,
    pub duration: String,
    #[serde(default)]
    pub do_not_substitute: bool,
    pub instructions: Option<String>,
}

fn default_form() -> DispensingForm {
    DispensingForm::Tablet
}
fn default_quantity() -> u32 {
    1
}
fn default_unit() -> String {
    "boîte".into()
}

#[derive(Deserialize)]
pub struct CreatePrescriptionRequest {
    pub patient_id: Uuid,
    pub date: Option<NaiveDate>,
    pub diagnosis: Option<String>,
    pub medications: Vec<MedicationEntry>,
    pub recommendations: Option<String>,
    #[serde(default)]
    pub renewals: u8,
    /// Base64 of the signature pad's PNG export.
    pub signature_png: String,
}

#[derive(Serialize)]
pub struct PrescriptionSummary {
    pub id: Uuid,
    pub number: String,
    pub date: NaiveDate,
    pub patient_name: String,
    pub doctor_name: String,
    pub medication_count: usize,
    pub filename: String,
}

impl From<&Prescription> for PrescriptionSummary {
    fn from(p: &Prescription) -> Self {
        Self {
            id: p.id,
            number: p.number.clone(),
            date: p.date,
            patient_name: p.patient.full_name(),
            doctor_name: p.doctor.full_name.clone(),
            medication_count: p.medications.len(),
            filename: ordonnance::document_filename(p),
        }
    }
}

/// `POST /api/prescriptions`
pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionContext>,
    Json(body): Json<CreatePrescriptionRequest>,
) -> Result<Json<PrescriptionSummary>, ApiError> {
    if !session.role.can(Capability::PrescribeMedications) {
        return Err(ApiError::Forbidden);
    }
    let doctor_id = session.doctor_id.ok_or(ApiError::Forbidden)?;

    // Double-click guard: one outstanding generation per signer.
    if !ctx.core.begin_submission(&session.email)? {
        return Err(ApiError::DuplicateSubmission(
            "Une génération d'ordonnance est déjà en cours".into(),
        ));
    }
    let result = create_inner(&ctx, doctor_id, body).await;
    ctx.core.end_submission(&session.email)?;
    result
}

async fn create_inner(
    ctx: &ApiContext,
    doctor_id: Uuid,
    body: CreatePrescriptionRequest,
) -> Result<Json<PrescriptionSummary>, ApiError> {
    // Preconditions, checked before any document work so a partial
    // ordonnance can never be produced.
    if body.medications.is_empty() {
        return Err(ApiError::BadRequest(
            "Ajoutez au moins un médicament avant de générer l'ordonnance".into(),
        ));
    }
    let signature_png = decode_signature(&body.signature_png)?;

    let patient = ctx
        .core
        .directory
        .find_patient(body.patient_id)
        .await
        .ok_or_else(|| ApiError::NotFound("Patient sélectionné inconnu".into()))?;
    let doctor = ctx
        .core
        .directory
        .find_doctor(doctor_id)
        .await
        .ok_or_else(|| ApiError::Internal("signed-in prescriber missing from directory".into()))?;

    // Per-line validation goes through the order builder so the API and
    // the console form share one rule set.
    let mut builder = OrderBuilder::new();
    for entry in body.medications {
        let draft = builder.draft_mut();
        draft.name = entry.name;
        draft.generic_name = entry.generic_name;
        draft.dosage = entry.dosage;
        draft.form = entry.form;
        draft.quantity = entry.quantity;
        draft.unit = entry.unit;
        draft.posology = entry.posology;
        draft.duration = entry.duration;
        draft.do_not_substitute = entry.do_not_substitute;
        draft.instructions = entry.instructions;
        builder.add_medication()?;
    }

    let date = body.date.unwrap_or_else(|| chrono::Local::now().date_naive());
    let prescription = {
        let mut registry = ctx.core.lock_registry()?;
        registry.finalize(PrescriptionForm {
            date,
            doctor,
            patient,
            diagnosis: body.diagnosis,
            medications: builder.into_medications(),
            recommendations: body.recommendations,
            renewals: body.renewals,
            signature_png,
            qr_payload: None,
            barcode_payload: None,
        })?
    };

    tracing::info!(number = %prescription.number, "prescription finalized");
    Ok(Json(PrescriptionSummary::from(&prescription)))
}

/// Decode and sanity-check the signature raster. An empty or undecodable
/// image is a precondition failure, surfaced before finalization.
fn decode_signature(encoded: &str) -> Result<Vec<u8>, ApiError> {
    if encoded.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Une signature est requise pour générer l'ordonnance".into(),
        ));
    }
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|_| ApiError::BadRequest("Signature illisible (base64 invalide)".into()))?;
    image::load_from_memory(&bytes)
        .map_err(|_| ApiError::BadRequest("Signature illisible (PNG invalide)".into()))?;
    Ok(bytes)
}

#[derive(Serialize)]
pub struct PrescriptionsResponse {
    pub prescriptions: Vec<PrescriptionSummary>,
}

/// `GET /api/prescriptions`, the session's finalized list.
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionContext>,
) -> Result<Json<PrescriptionsResponse>, ApiError> {
    if !session.role.can(Capability::PrescribeMedications) {
        return Err(ApiError::Forbidden);
    }
    let registry = ctx.core.lock_registry()?;
    let prescriptions = registry.all().iter().map(PrescriptionSummary::from).collect();
    Ok(Json(PrescriptionsResponse { prescriptions }))
}

/// `GET /api/prescriptions/:id/document`: render and download the PDF.
pub async fn document(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionContext>,
    Path(prescription_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    if !session.role.can(Capability::PrescribeMedications) {
        return Err(ApiError::Forbidden);
    }

    let prescription = {
        let registry = ctx.core.lock_registry()?;
        registry
            .find(prescription_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("Ordonnance {prescription_id} inconnue")))?
    };

    let rendered = ordonnance::render_prescription(&prescription)?;
    let disposition = format!("attachment; filename=\"{}\"", rendered.filename);

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        rendered.bytes,
    )
        .into_response())
}
