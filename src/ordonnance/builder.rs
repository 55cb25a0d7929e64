//! Medication order builder.
//!
//! Holds the staged draft entry bound to the prescription form plus the
//! committed, ordered list of line items. Entry order is preserved all the
//! way to the rendered document (numbered 1..N).

use uuid::Uuid;

use crate::models::enums::DispensingForm;
use crate::models::prescription::MedicationItem;

/// Default packaging unit for a fresh draft.
const DEFAULT_UNIT: &str = "boîte";

/// In-progress medication entry. Not part of the committed list until
/// [`OrderBuilder::add_medication`] accepts it.
#[derive(Debug, Clone)]
pub struct MedicationDraft {
    pub name: String,
    pub generic_name: Option<String>,
    pub dosage: String,
    pub form: DispensingForm,
    pub quantity: u32,
    pub unit: String,
    pub posology: String,
    pub duration: String,
    pub do_not_substitute: bool,
    pub instructions: Option<String>,
}

impl Default for MedicationDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            generic_name: None,
            dosage: String::new(),
            form: DispensingForm::Tablet,
            quantity: 1,
            unit: DEFAULT_UNIT.into(),
            posology: String::new(),
            duration: String::new(),
            do_not_substitute: false,
            instructions: None,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OrderError {
    #[error("Required field '{0}' is empty")]
    MissingField(&'static str),
}

/// Ordered, mutable medication list for the prescription being drafted.
#[derive(Debug, Default)]
pub struct OrderBuilder {
    draft: MedicationDraft,
    items: Vec<MedicationItem>,
}

impl OrderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &MedicationDraft {
        &self.draft
    }

    /// Staged entry bound to the form fields.
    pub fn draft_mut(&mut self) -> &mut MedicationDraft {
        &mut self.draft
    }

    /// Validate the staged draft and append it to the committed list.
    ///
    /// Name, dosage, posology and duration must all be non-blank; the first
    /// missing one is reported as a field-level error and the committed list
    /// stays untouched. On success the new entry's id is returned and the
    /// draft resets to its defaults.
    pub fn add_medication(&mut self) -> Result<Uuid, OrderError> {
        for (field, value) in [
            ("name", &self.draft.name),
            ("dosage", &self.draft.dosage),
            ("posology", &self.draft.posology),
            ("duration", &self.draft.duration),
        ] {
            if value.trim().is_empty() {
                return Err(OrderError::MissingField(field));
            }
        }

        let draft = std::mem::take(&mut self.draft);
        let id = Uuid::new_v4();
        self.items.push(MedicationItem {
            id,
            name: draft.name.trim().into(),
            generic_name: draft.generic_name.filter(|g| !g.trim().is_empty()),
            dosage: draft.dosage.trim().into(),
            form: draft.form,
            quantity: draft.quantity,
            unit: draft.unit,
            posology: draft.posology.trim().into(),
            duration: draft.duration.trim().into(),
            do_not_substitute: draft.do_not_substitute,
            instructions: draft.instructions.filter(|i| !i.trim().is_empty()),
        });
        Ok(id)
    }

    /// Remove the entry with the given id, preserving the relative order of
    /// the rest. Returns `false` when no entry matched.
    pub fn remove_medication(&mut self, id: Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|m| m.id != id);
        self.items.len() != before
    }

    pub fn medications(&self) -> &[MedicationItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Hand the committed list over for finalization.
    pub fn into_medications(self) -> Vec<MedicationItem> {
        self.items
    }
}
