use std::sync::Mutex;

use crate::models::PatientMap;

use super::{PatientStore, StoreError};

/// In-memory store with the same full-load / full-save contract as the file
/// store. Used as the test double and for embedded setups.
#[derive(Debug, Default)]
pub struct MemoryStore {
    patients: Mutex<PatientMap>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with existing records.
    pub fn with_patients(patients: PatientMap) -> Self {
        Self {
            patients: Mutex::new(patients),
        }
    }
}

impl PatientStore for MemoryStore {
    fn load(&self) -> Result<PatientMap, StoreError> {
        let patients = self.patients.lock().unwrap_or_else(|e| e.into_inner());
        Ok(patients.clone())
    }

    fn save(&self, patients: &PatientMap) -> Result<(), StoreError> {
        let mut guard = self.patients.lock().unwrap_or_else(|e| e.into_inner());
        *guard = patients.clone();
        Ok(())
    }
}
