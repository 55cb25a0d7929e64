use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prescriber identity as printed on the ordonnance header.
/// Supplied by the session layer; immutable for the duration of a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorInfo {
    pub id: Uuid,
    pub full_name: String,
    pub specialty: String,
    pub license_number: String,
    pub practice_name: String,
    pub practice_address: String,
    pub phone: String,
    pub email: String,
}
