use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::Gender;

/// Patient identity block for a prescription. Immutable input; the
/// prescription flow receives it fully populated from the directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientInfo {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub address: String,
    pub phone: String,
    pub weight_kg: Option<f32>,
    pub allergies: Option<String>,
}

impl PatientInfo {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Age in whole years on the given date; 0 for a date before birth.
    pub fn age_on(&self, date: NaiveDate) -> u32 {
        date.years_since(self.date_of_birth).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient(dob: NaiveDate) -> PatientInfo {
        PatientInfo {
            id: Uuid::new_v4(),
            first_name: "Amine".into(),
            last_name: "Zidane".into(),
            date_of_birth: dob,
            gender: Gender::Male,
            address: "12 rue Didouche Mourad, Alger".into(),
            phone: "+213 555 10 20 30".into(),
            weight_kg: None,
            allergies: None,
        }
    }

    #[test]
    fn full_name_joins_first_and_last() {
        let p = patient(NaiveDate::from_ymd_opt(1990, 3, 14).unwrap());
        assert_eq!(p.full_name(), "Amine Zidane");
    }

    #[test]
    fn age_counts_whole_years() {
        let p = patient(NaiveDate::from_ymd_opt(1990, 3, 14).unwrap());
        let on = NaiveDate::from_ymd_opt(2026, 3, 13).unwrap();
        assert_eq!(p.age_on(on), 35);
        let on = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        assert_eq!(p.age_on(on), 36);
    }

    #[test]
    fn age_is_zero_before_birth() {
        let p = patient(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap());
        let on = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert_eq!(p.age_on(on), 0);
    }
}
