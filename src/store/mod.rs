mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::query::LeadQuery;
use crate::types::{Lead, LeadPage, LeadStats};

/// Store defines the lead persistence interface.
///
/// Implementations serialize their own access; callers add no locking. Every write
/// checks the record with [`crate::types::validate_record`] first.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    fn create_lead(&self, lead: &Lead) -> Result<()>;
    /// Inserts all leads or none of them.
    fn insert_leads(&self, leads: &[Lead]) -> Result<()>;
    fn get_lead(&self, id: &str) -> Result<Option<Lead>>;
    fn list_leads(&self, query: &LeadQuery) -> Result<LeadPage>;
    fn update_lead(&self, lead: &Lead) -> Result<()>;
    /// Removes every lead, returning how many were deleted.
    fn clear_leads(&self) -> Result<usize>;

    fn lead_stats(&self) -> Result<LeadStats>;

    fn close(&self) -> Result<()>;
}
