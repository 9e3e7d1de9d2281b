pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

use crate::models::PatientMap;

/// Errors from the persistence layer. Surfaced to the caller as a storage
/// failure, never retried or recovered.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persistence seam for patient records. The whole map is loaded at the start
/// of every operation and written back whole on every mutation.
pub trait PatientStore: Send + Sync {
    /// Read the entire persisted state.
    fn load(&self) -> Result<PatientMap, StoreError>;

    /// Replace the entire persisted state.
    fn save(&self, patients: &PatientMap) -> Result<(), StoreError>;
}
