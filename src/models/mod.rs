pub mod appointment;
pub mod clinic;
pub mod doctor;
pub mod enums;
pub mod medicine;
pub mod patient;
pub mod prescription;

pub use appointment::Appointment;
pub use clinic::Clinic;
pub use doctor::DoctorInfo;
pub use enums::{AppointmentStatus, DispensingForm, Gender};
pub use medicine::Medicine;
pub use patient::PatientInfo;
pub use prescription::{MedicationItem, Prescription, PrescriptionError};

/// Errors from model-level parsing and validation.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Invalid value '{value}' for {field}")]
    InvalidEnum { field: String, value: String },
}
