//! Prescription authoring: order builder, finalization registry, and the
//! PDF document assembler.

pub mod builder;
pub mod codes;
pub mod pdf;

pub use builder::{MedicationDraft, OrderBuilder, OrderError};
pub use pdf::{
    document_filename, render_prescription, save_prescription_pdf, DocumentError,
    RenderedDocument,
};

use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

use crate::models::doctor::DoctorInfo;
use crate::models::patient::PatientInfo;
use crate::models::prescription::{MedicationItem, Prescription, PrescriptionError};

/// Everything the signer has assembled when pressing "generate".
#[derive(Debug, Clone)]
pub struct PrescriptionForm {
    pub date: NaiveDate,
    pub doctor: DoctorInfo,
    pub patient: PatientInfo,
    pub diagnosis: Option<String>,
    pub medications: Vec<MedicationItem>,
    pub recommendations: Option<String>,
    pub renewals: u8,
    pub signature_png: Vec<u8>,
    pub qr_payload: Option<String>,
    pub barcode_payload: Option<String>,
}

/// Session-scoped store of finalized prescriptions.
///
/// Holds the monotonic sequence behind the human-readable numbers and the
/// in-memory list for the session; nothing survives a restart.
#[derive(Debug, Default)]
pub struct PrescriptionRegistry {
    prescriptions: Vec<Prescription>,
    next_seq: u32,
}

impl PrescriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next human-readable number, e.g. "ORD-2026-0001".
    fn next_number(&mut self, year: i32) -> String {
        self.next_seq += 1;
        format!("ORD-{year}-{:04}", self.next_seq)
    }

    /// Run the finalization preconditions and store the immutable result.
    pub fn finalize(&mut self, form: PrescriptionForm) -> Result<Prescription, PrescriptionError> {
        // Rejected finalizations leave a gap in the sequence; gaps are
        // fine, duplicate numbers are not.
        let number = self.next_number(form.date.year());
        let prescription = Prescription::new(
            number,
            form.date,
            form.doctor,
            form.patient,
            form.diagnosis,
            form.medications,
            form.recommendations,
            form.renewals,
            form.signature_png,
            form.qr_payload,
            form.barcode_payload,
        )?;
        self.prescriptions.push(prescription.clone());
        Ok(prescription)
    }

    pub fn all(&self) -> &[Prescription] {
        &self.prescriptions
    }

    pub fn find(&self, id: Uuid) -> Option<&Prescription> {
        self.prescriptions.iter().find(|p| p.id == id)
    }
}
