//! Mock data/service layer.
//!
//! Fixture collections behind simulated-latency async functions, the
//! stand-in for a real clinic backend. All data in this module is hardcoded
//! and fictional; no external systems are contacted. The prescription core
//! consumes only the patient/doctor shapes and is agnostic to this layer.

use std::time::Duration;

use chrono::NaiveDate;
use serde::Serialize;
use uuid::{uuid, Uuid};

use crate::models::enums::{AppointmentStatus, DispensingForm, Gender};
use crate::models::{Appointment, Clinic, DoctorInfo, Medicine, PatientInfo};

// Stable fixture ids so credentials and appointments can reference them.
pub const DR_BENALI: Uuid = uuid!("7d5c1c02-8a3e-4b5f-9b2a-0c1d2e3f4a50");
pub const DR_MEZIANE: Uuid = uuid!("3b9e7a14-52cd-4e8f-8d16-9f0a1b2c3d41");
pub const PATIENT_ZIDANE: Uuid = uuid!("a1f0c2d4-6e8b-4a1c-9d3e-5f7a9b1c2d30");
pub const PATIENT_HAMIDI: Uuid = uuid!("c4d5e6f7-1a2b-4c3d-8e9f-0a1b2c3d4e52");
pub const PATIENT_CHERIF: Uuid = uuid!("e8f9a0b1-3c4d-4e5f-9a8b-7c6d5e4f3a21");

/// Simulated network latency for the fixture fetches.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(350);

/// Dashboard statistic cards.
#[derive(Debug, Clone, Serialize)]
pub struct ClinicStats {
    pub patients: u32,
    pub appointments_scheduled: u32,
    pub prescriptions_issued: u32,
    pub medicines_low_stock: u32,
}

/// One point of a dashboard chart series.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: u32,
}

/// Fixture directory with artificial latency. Zero latency in tests via
/// [`MockDirectory::instant`].
#[derive(Debug, Clone)]
pub struct MockDirectory {
    latency: Duration,
}

impl Default for MockDirectory {
    fn default() -> Self {
        Self::new(DEFAULT_LATENCY)
    }
}

impl MockDirectory {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    pub async fn fetch_doctors(&self) -> Vec<DoctorInfo> {
        self.simulate_latency().await;
        doctors()
    }

    pub async fn fetch_patients(&self) -> Vec<PatientInfo> {
        self.simulate_latency().await;
        patients()
    }

    pub async fn fetch_clinics(&self) -> Vec<Clinic> {
        self.simulate_latency().await;
        clinics()
    }

    pub async fn fetch_appointments(&self) -> Vec<Appointment> {
        self.simulate_latency().await;
        appointments()
    }

    pub async fn fetch_medicines(&self) -> Vec<Medicine> {
        self.simulate_latency().await;
        medicines()
    }

    pub async fn fetch_clinic_stats(&self) -> ClinicStats {
        self.simulate_latency().await;
        let appointments = appointments();
        ClinicStats {
            patients: patients().len() as u32,
            appointments_scheduled: appointments
                .iter()
                .filter(|a| a.status == AppointmentStatus::Scheduled)
                .count() as u32,
            prescriptions_issued: 128,
            medicines_low_stock: medicines().iter().filter(|m| m.is_low_stock()).count() as u32,
        }
    }

    /// Monthly consultation counts for the dashboard chart.
    pub async fn fetch_visits_series(&self) -> Vec<SeriesPoint> {
        self.simulate_latency().await;
        [
            ("Jan", 182),
            ("Fév", 160),
            ("Mar", 201),
            ("Avr", 174),
            ("Mai", 219),
            ("Juin", 196),
        ]
        .into_iter()
        .map(|(label, value)| SeriesPoint {
            label: label.into(),
            value,
        })
        .collect()
    }

    pub async fn find_patient(&self, id: Uuid) -> Option<PatientInfo> {
        self.simulate_latency().await;
        patients().into_iter().find(|p| p.id == id)
    }

    pub async fn find_doctor(&self, id: Uuid) -> Option<DoctorInfo> {
        self.simulate_latency().await;
        doctors().into_iter().find(|d| d.id == id)
    }
}

// ─── Fixtures ─────────────────────────────────────────────────────────────────

fn doctors() -> Vec<DoctorInfo> {
    vec![
        DoctorInfo {
            id: DR_BENALI,
            full_name: "Dr. Leila Benali".into(),
            specialty: "Médecine générale".into(),
            license_number: "16-04-1234".into(),
            practice_name: "Clinique El Azhar".into(),
            practice_address: "5 avenue Pasteur, Alger".into(),
            phone: "+213 21 60 11 22".into(),
            email: "l.benali@clinique-elazhar.dz".into(),
        },
        DoctorInfo {
            id: DR_MEZIANE,
            full_name: "Dr. Karim Meziane".into(),
            specialty: "Cardiologie".into(),
            license_number: "16-09-5678".into(),
            practice_name: "Clinique El Azhar".into(),
            practice_address: "5 avenue Pasteur, Alger".into(),
            phone: "+213 21 60 11 23".into(),
            email: "k.meziane@clinique-elazhar.dz".into(),
        },
    ]
}

fn patients() -> Vec<PatientInfo> {
    vec![
        PatientInfo {
            id: PATIENT_ZIDANE,
            first_name: "Amine".into(),
            last_name: "Zidane".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 3, 14).expect("valid fixture date"),
            gender: Gender::Male,
            address: "12 rue Didouche Mourad, Alger".into(),
            phone: "+213 555 10 20 30".into(),
            weight_kg: Some(78.0),
            allergies: None,
        },
        PatientInfo {
            id: PATIENT_HAMIDI,
            first_name: "Yasmine".into(),
            last_name: "Hamidi".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1984, 11, 2).expect("valid fixture date"),
            gender: Gender::Female,
            address: "3 cité des Oliviers, Oran".into(),
            phone: "+213 555 44 55 66".into(),
            weight_kg: Some(63.5),
            allergies: Some("Pénicilline".into()),
        },
        PatientInfo {
            id: PATIENT_CHERIF,
            first_name: "Mohamed".into(),
            last_name: "Cherif".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1956, 7, 28).expect("valid fixture date"),
            gender: Gender::Male,
            address: "27 boulevard Zighout Youcef, Constantine".into(),
            phone: "+213 555 77 88 99".into(),
            weight_kg: None,
            allergies: Some("Aspirine".into()),
        },
    ]
}

fn clinics() -> Vec<Clinic> {
    vec![
        Clinic {
            id: uuid!("0f1e2d3c-4b5a-4697-8b2a-000000000000"),
            name: "Clinique El Azhar".into(),
            address: "5 avenue Pasteur, Alger".into(),
            phone: "+213 21 60 11 22".into(),
            bed_capacity: 48,
            doctor_count: 12,
        },
        Clinic {
            id: uuid!("9a8b7c6d-5e4f-4321-b0a9-111111111111"),
            name: "Polyclinique des Oliviers".into(),
            address: "3 cité des Oliviers, Oran".into(),
            phone: "+213 41 33 22 11".into(),
            bed_capacity: 30,
            doctor_count: 7,
        },
    ]
}

fn appointments() -> Vec<Appointment> {
    vec![
        Appointment {
            id: uuid!("11111111-2222-4333-8444-555555555501"),
            patient_id: PATIENT_ZIDANE,
            doctor_id: DR_BENALI,
            date: NaiveDate::from_ymd_opt(2026, 2, 20).expect("valid fixture date"),
            time: "09:30".into(),
            reason: "Fièvre et courbatures".into(),
            status: AppointmentStatus::Scheduled,
        },
        Appointment {
            id: uuid!("11111111-2222-4333-8444-555555555502"),
            patient_id: PATIENT_HAMIDI,
            doctor_id: DR_MEZIANE,
            date: NaiveDate::from_ymd_opt(2026, 2, 20).expect("valid fixture date"),
            time: "10:15".into(),
            reason: "Contrôle tension artérielle".into(),
            status: AppointmentStatus::Scheduled,
        },
        Appointment {
            id: uuid!("11111111-2222-4333-8444-555555555503"),
            patient_id: PATIENT_CHERIF,
            doctor_id: DR_BENALI,
            date: NaiveDate::from_ymd_opt(2026, 2, 13).expect("valid fixture date"),
            time: "14:00".into(),
            reason: "Renouvellement de traitement".into(),
            status: AppointmentStatus::Completed,
        },
    ]
}

fn medicines() -> Vec<Medicine> {
    vec![
        Medicine {
            id: uuid!("22222222-3333-4444-8555-666666666601"),
            name: "Doliprane".into(),
            generic_name: Some("Paracétamol".into()),
            dosage: "500mg".into(),
            form: DispensingForm::Tablet,
            unit_price: 120.0,
            stock: 240,
        },
        Medicine {
            id: uuid!("22222222-3333-4444-8555-666666666602"),
            name: "Clamoxyl".into(),
            generic_name: Some("Amoxicilline".into()),
            dosage: "1g".into(),
            form: DispensingForm::Tablet,
            unit_price: 310.0,
            stock: 85,
        },
        Medicine {
            id: uuid!("22222222-3333-4444-8555-666666666603"),
            name: "Ventoline".into(),
            generic_name: Some("Salbutamol".into()),
            dosage: "100µg/dose".into(),
            form: DispensingForm::Other,
            unit_price: 540.0,
            stock: 6,
        },
        Medicine {
            id: uuid!("22222222-3333-4444-8555-666666666604"),
            name: "Bétadine".into(),
            generic_name: Some("Povidone iodée".into()),
            dosage: "10%".into(),
            form: DispensingForm::Ointment,
            unit_price: 260.0,
            stock: 3,
        },
    ]
}
