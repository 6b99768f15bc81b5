use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::consultant::{Consultant, ConsultantFilter};

/// Read-only contract against the consultant directory
///
/// The directory is owned elsewhere; this core only looks consultants up by
/// id and runs filtered listings (recommendations, batch approval checks).
#[async_trait]
pub trait ConsultantDirectory: Send + Sync {
    /// Find a consultant by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Consultant>, String>;

    /// Filtered listing, ordered by experience (desc) then recency (desc)
    async fn find_many(&self, filter: &ConsultantFilter) -> Result<Vec<Consultant>, String>;
}
