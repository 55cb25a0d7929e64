//! Finalized medication order record and its line items.
//!
//! A `Prescription` is only ever built through [`Prescription::new`], which
//! enforces the non-empty medication list and captured-signature invariants.
//! Once built it is immutable and goes straight to the document assembler.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::doctor::DoctorInfo;
use super::enums::DispensingForm;
use super::patient::PatientInfo;

/// One drug entry within a prescription.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicationItem {
    pub id: Uuid,
    pub name: String,
    pub generic_name: Option<String>,
    pub dosage: String,
    pub form: DispensingForm,
    pub quantity: u32,
    /// Packaging unit for the quantity, e.g. "boîte".
    pub unit: String,
    /// Dosing instructions, e.g. "1 comprimé x3/jour".
    pub posology: String,
    pub duration: String,
    pub do_not_substitute: bool,
    pub instructions: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum PrescriptionError {
    #[error("A prescription requires at least one medication")]
    NoMedications,
    #[error("A prescription requires a captured signature")]
    MissingSignature,
}

/// The finalized, immutable order rendered to a PDF document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prescription {
    pub id: Uuid,
    /// Human-readable sequential number, e.g. "ORD-2026-0042".
    pub number: String,
    pub date: NaiveDate,
    pub doctor: DoctorInfo,
    pub patient: PatientInfo,
    pub diagnosis: Option<String>,
    pub medications: Vec<MedicationItem>,
    pub recommendations: Option<String>,
    /// 0 = non-renewable.
    pub renewals: u8,
    /// Lossless raster of the handwritten signature (PNG bytes).
    pub signature_png: Vec<u8>,
    /// Value encoded in the document QR code.
    pub qr_payload: String,
    /// Value encoded in the document barcode.
    pub barcode_payload: String,
}

impl Prescription {
    /// Build a prescription, enforcing the finalization preconditions:
    /// at least one medication and a non-empty signature raster.
    ///
    /// `qr_payload`/`barcode_payload` default to the generated id when
    /// not supplied.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        number: String,
        date: NaiveDate,
        doctor: DoctorInfo,
        patient: PatientInfo,
        diagnosis: Option<String>,
        medications: Vec<MedicationItem>,
        recommendations: Option<String>,
        renewals: u8,
        signature_png: Vec<u8>,
        qr_payload: Option<String>,
        barcode_payload: Option<String>,
    ) -> Result<Self, PrescriptionError> {
        if medications.is_empty() {
            return Err(PrescriptionError::NoMedications);
        }
        if signature_png.is_empty() {
            return Err(PrescriptionError::MissingSignature);
        }

        let id = Uuid::new_v4();
        let default_payload = id.to_string();

        Ok(Self {
            id,
            number,
            date,
            doctor,
            patient,
            diagnosis,
            medications,
            recommendations,
            renewals,
            signature_png,
            qr_payload: qr_payload.unwrap_or_else(|| default_payload.clone()),
            barcode_payload: barcode_payload.unwrap_or(default_payload),
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::models::enums::Gender;

    pub fn sample_doctor() -> DoctorInfo {
        DoctorInfo {
            id: Uuid::new_v4(),
            full_name: "Dr. Leila Benali".into(),
            specialty: "Médecine générale".into(),
            license_number: "16-04-1234".into(),
            practice_name: "Clinique El Azhar".into(),
            practice_address: "5 avenue Pasteur, Alger".into(),
            phone: "+213 21 60 11 22".into(),
            email: "contact@clinique-elazhar.dz".into(),
        }
    }

    pub fn sample_patient() -> PatientInfo {
        PatientInfo {
            id: Uuid::new_v4(),
            first_name: "Amine".into(),
            last_name: "Zidane".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 3, 14).unwrap(),
            gender: Gender::Male,
            address: "12 rue Didouche Mourad, Alger".into(),
            phone: "+213 555 10 20 30".into(),
            weight_kg: Some(78.0),
            allergies: None,
        }
    }

    pub fn sample_item(name: &str) -> MedicationItem {
        MedicationItem {
            id: Uuid::new_v4(),
            name: name.into(),
            generic_name: None,
            dosage: "500mg".into(),
            form: DispensingForm::Tablet,
            quantity: 1,
            unit: "boîte".into(),
            posology: "1 comprimé x3/jour".into(),
            duration: "5 jours".into(),
            do_not_substitute: false,
            instructions: None,
        }
    }

    pub fn sample_prescription() -> Prescription {
        Prescription::new(
            "ORD-2026-0001".into(),
            NaiveDate::from_ymd_opt(2026, 2, 20).unwrap(),
            sample_doctor(),
            sample_patient(),
            Some("Syndrome grippal".into()),
            vec![sample_item("Paracetamol")],
            Some("Repos et hydratation. Reconsulter si la fièvre persiste au-delà de 48h.".into()),
            0,
            vec![0x89, b'P', b'N', b'G'],
            None,
            None,
        )
        .unwrap()
    }
}
