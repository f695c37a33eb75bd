use crate::domain::entities::resolution::ResolutionRecord;
use crate::domain::error::DomainError;

/// Persistent cache of resolution records.
pub trait ResolutionStore: Send + Sync {
    /// All stored records. A store that does not exist yet is empty.
    fn load(&self) -> Result<Vec<ResolutionRecord>, DomainError>;

    /// Replace the stored records.
    fn save(&self, records: &[ResolutionRecord]) -> Result<(), DomainError>;

    /// Human-readable location for reports.
    fn location(&self) -> String;
}
