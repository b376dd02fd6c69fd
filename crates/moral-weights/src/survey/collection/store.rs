use super::domain::StoredSubmission;

/// Append-only storage abstraction so the collection service can be exercised
/// without a filesystem.
pub trait ResponseStore: Send + Sync {
    fn append(&self, record: StoredSubmission) -> Result<(), StoreError>;
    fn load(&self) -> Result<Vec<StoredSubmission>, StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
