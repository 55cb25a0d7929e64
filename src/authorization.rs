//! Role-based console authorization.
//!
//! Each console role maps once to a closed capability set and to its
//! sidebar navigation, looked up through the enum rather than re-derived
//! from role-name strings at every call site. Default-deny: a capability
//! absent from the set is refused.

use serde::{Deserialize, Serialize};

use crate::models::ModelError;

/// Console roles. Closed set: adding a role means revisiting every
/// capability table below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    SuperUser,
    ClinicAdmin,
    Doctor,
    Nurse,
    Pharmacy,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperUser => "super_user",
            Self::ClinicAdmin => "clinic_admin",
            Self::Doctor => "doctor",
            Self::Nurse => "nurse",
            Self::Pharmacy => "pharmacy",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_user" => Ok(Self::SuperUser),
            "clinic_admin" => Ok(Self::ClinicAdmin),
            "doctor" => Ok(Self::Doctor),
            "nurse" => Ok(Self::Nurse),
            "pharmacy" => Ok(Self::Pharmacy),
            _ => Err(ModelError::InvalidEnum {
                field: "Role".into(),
                value: s.into(),
            }),
        }
    }
}

/// Console capabilities gated per role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Capability {
    ViewDashboard,
    ManageClinics,
    ManageUsers,
    ManagePatients,
    ManageAppointments,
    ManageMedicines,
    PrescribeMedications,
    DispenseMedications,
}

impl Role {
    /// The role's full capability set.
    pub fn capabilities(&self) -> &'static [Capability] {
        use Capability::*;
        match self {
            Self::SuperUser => &[
                ViewDashboard,
                ManageClinics,
                ManageUsers,
                ManagePatients,
                ManageAppointments,
                ManageMedicines,
            ],
            Self::ClinicAdmin => &[
                ViewDashboard,
                ManageUsers,
                ManagePatients,
                ManageAppointments,
                ManageMedicines,
            ],
            Self::Doctor => &[
                ViewDashboard,
                ManagePatients,
                ManageAppointments,
                PrescribeMedications,
            ],
            Self::Nurse => &[ViewDashboard, ManagePatients, ManageAppointments],
            Self::Pharmacy => &[ViewDashboard, ManageMedicines, DispenseMedications],
        }
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    /// Sidebar entries for the role's console, in display order.
    pub fn navigation(&self) -> Vec<NavEntry> {
        let mut entries = vec![NavEntry::new("Tableau de bord", "/dashboard")];
        if self.can(Capability::ManageClinics) {
            entries.push(NavEntry::new("Cliniques", "/clinics"));
        }
        if self.can(Capability::ManagePatients) {
            entries.push(NavEntry::new("Patients", "/patients"));
        }
        if self.can(Capability::ManageAppointments) {
            entries.push(NavEntry::new("Rendez-vous", "/appointments"));
        }
        if self.can(Capability::ManageMedicines) {
            entries.push(NavEntry::new("Médicaments", "/medicines"));
        }
        if self.can(Capability::PrescribeMedications) {
            entries.push(NavEntry::new("Ordonnances", "/prescriptions"));
        }
        entries
    }
}

/// One sidebar navigation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavEntry {
    pub label: String,
    pub path: String,
}

impl NavEntry {
    fn new(label: &str, path: &str) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn role_round_trip() {
        for role in [
            Role::SuperUser,
            Role::ClinicAdmin,
            Role::Doctor,
            Role::Nurse,
            Role::Pharmacy,
        ] {
            assert_eq!(Role::from_str(role.as_str()).unwrap(), role);
        }
        assert!(Role::from_str("admin").is_err());
    }

    #[test]
    fn only_doctors_prescribe() {
        assert!(Role::Doctor.can(Capability::PrescribeMedications));
        for role in [Role::SuperUser, Role::ClinicAdmin, Role::Nurse, Role::Pharmacy] {
            assert!(!role.can(Capability::PrescribeMedications), "{role:?}");
        }
    }

    #[test]
    fn only_pharmacy_dispenses() {
        assert!(Role::Pharmacy.can(Capability::DispenseMedications));
        assert!(!Role::Doctor.can(Capability::DispenseMedications));
    }

    #[test]
    fn only_super_user_manages_clinics() {
        assert!(Role::SuperUser.can(Capability::ManageClinics));
        for role in [Role::ClinicAdmin, Role::Doctor, Role::Nurse, Role::Pharmacy] {
            assert!(!role.can(Capability::ManageClinics), "{role:?}");
        }
    }

    #[test]
    fn everyone_sees_a_dashboard() {
        for role in [
            Role::SuperUser,
            Role::ClinicAdmin,
            Role::Doctor,
            Role::Nurse,
            Role::Pharmacy,
        ] {
            assert!(role.can(Capability::ViewDashboard));
            assert_eq!(role.navigation()[0].path, "/dashboard");
        }
    }

    #[test]
    fn navigation_follows_capabilities() {
        let doctor = Role::Doctor.navigation();
        assert!(doctor.iter().any(|e| e.path == "/prescriptions"));
        assert!(!doctor.iter().any(|e| e.path == "/clinics"));

        let pharmacy = Role::Pharmacy.navigation();
        assert!(pharmacy.iter().any(|e| e.path == "/medicines"));
        assert!(!pharmacy.iter().any(|e| e.path == "/patients"));
    }
}
