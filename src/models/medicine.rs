use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::DispensingForm;

/// Stock threshold below which the pharmacy dashboard flags a medicine.
pub const LOW_STOCK_THRESHOLD: u32 = 10;

/// Pharmacy catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medicine {
    pub id: Uuid,
    pub name: String,
    pub generic_name: Option<String>,
    pub dosage: String,
    pub form: DispensingForm,
    pub unit_price: f64,
    pub stock: u32,
}

impl Medicine {
    pub fn is_low_stock(&self) -> bool {
        self.stock < LOW_STOCK_THRESHOLD
    }
}
