use std::fs;
use std::path::{Path, PathBuf};

use crate::models::PatientMap;

use super::{PatientStore, StoreError};

/// Store backed by a single JSON file holding the full id -> record object.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store over the given file path. The file is not touched until
    /// the first load or save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PatientStore for FileStore {
    fn load(&self) -> Result<PatientMap, StoreError> {
        let contents = fs::read_to_string(&self.path)?;
        let patients: PatientMap = serde_json::from_str(&contents)?;
        tracing::debug!(
            "Loaded {} patient records from {}",
            patients.len(),
            self.path.display()
        );
        Ok(patients)
    }

    fn save(&self, patients: &PatientMap) -> Result<(), StoreError> {
        let contents = serde_json::to_string_pretty(patients)?;
        fs::write(&self.path, contents)?;
        tracing::debug!(
            "Wrote {} patient records to {}",
            patients.len(),
            self.path.display()
        );
        Ok(())
    }
}
