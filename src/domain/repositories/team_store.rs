use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::team::{Team, TeamStatus};

/// Page of a client's teams
#[derive(Debug, Clone)]
pub struct TeamPage {
    pub teams: Vec<Team>,
    pub total: u64,
}

/// Store contract for the Team aggregate
///
/// Implementations handle persistence details; errors are backend messages
/// the service wraps into its storage error kind.
#[async_trait]
pub trait TeamStore: Send + Sync {
    /// Save a team (insert or update the whole aggregate)
    async fn save(&self, team: &Team) -> Result<(), String>;

    /// Find a team by its ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Team>, String>;

    /// Find a shared team by its share link id
    async fn find_by_share_link(&self, share_link_id: &str) -> Result<Option<Team>, String>;

    /// A page of a client's teams, newest-updated first
    async fn find_by_client(
        &self,
        client: Uuid,
        status: Option<TeamStatus>,
        skip: usize,
        limit: usize,
    ) -> Result<TeamPage, String>;

    /// How many teams a client currently owns
    async fn count_by_client(&self, client: Uuid) -> Result<u64, String>;

    /// Delete a team by ID; Ok(false) when nothing matched
    async fn delete(&self, id: Uuid) -> Result<bool, String>;
}
