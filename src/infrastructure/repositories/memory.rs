use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::consultant::{Consultant, ConsultantFilter};
use crate::domain::repositories::{ConsultantDirectory, TeamPage, TeamStore};
use crate::domain::team::{Team, TeamStatus};

/// In-memory team store
///
/// Backs the integration tests and local development; the aggregate is the
/// unit of storage, mirroring the document shape the Postgres adapter
/// persists.
#[derive(Default)]
pub struct InMemoryTeamStore {
    teams: RwLock<HashMap<Uuid, Team>>,
}

impl InMemoryTeamStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TeamStore for InMemoryTeamStore {
    async fn save(&self, team: &Team) -> Result<(), String> {
        self.teams.write().await.insert(team.id(), team.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Team>, String> {
        Ok(self.teams.read().await.get(&id).cloned())
    }

    async fn find_by_share_link(&self, share_link_id: &str) -> Result<Option<Team>, String> {
        Ok(self
            .teams
            .read()
            .await
            .values()
            .find(|team| team.share_link_id() == Some(share_link_id))
            .cloned())
    }

    async fn find_by_client(
        &self,
        client: Uuid,
        status: Option<TeamStatus>,
        skip: usize,
        limit: usize,
    ) -> Result<TeamPage, String> {
        let guard = self.teams.read().await;
        let mut matching: Vec<Team> = guard
            .values()
            .filter(|team| team.client() == client)
            .filter(|team| status.map_or(true, |s| team.status() == s))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.updated_at().cmp(&a.updated_at()));

        let total = matching.len() as u64;
        let teams = matching.into_iter().skip(skip).take(limit).collect();
        Ok(TeamPage { teams, total })
    }

    async fn count_by_client(&self, client: Uuid) -> Result<u64, String> {
        Ok(self
            .teams
            .read()
            .await
            .values()
            .filter(|team| team.client() == client)
            .count() as u64)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, String> {
        Ok(self.teams.write().await.remove(&id).is_some())
    }
}

/// In-memory consultant directory
#[derive(Default)]
pub struct InMemoryConsultantDirectory {
    consultants: RwLock<HashMap<Uuid, Consultant>>,
}

impl InMemoryConsultantDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a consultant record
    pub async fn insert(&self, consultant: Consultant) {
        self.consultants
            .write()
            .await
            .insert(consultant.id, consultant);
    }
}

#[async_trait]
impl ConsultantDirectory for InMemoryConsultantDirectory {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Consultant>, String> {
        Ok(self.consultants.read().await.get(&id).cloned())
    }

    async fn find_many(&self, filter: &ConsultantFilter) -> Result<Vec<Consultant>, String> {
        let guard = self.consultants.read().await;
        let mut matching: Vec<Consultant> = guard
            .values()
            .filter(|consultant| filter.matches(consultant))
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            b.experience_years
                .cmp(&a.experience_years)
                .then(b.created_at.cmp(&a.created_at))
        });

        let limited = matching
            .into_iter()
            .skip(filter.skip)
            .take(filter.limit.unwrap_or(usize::MAX))
            .collect();
        Ok(limited)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::consultant::{Availability, RateCard, UserSummary};
    use crate::domain::team::{BillingPeriod, TeamRequirements};
    use chrono::Utc;

    fn consultant(experience: u32) -> Consultant {
        Consultant {
            id: Uuid::new_v4(),
            user: UserSummary::default(),
            headline: None,
            roles: vec![],
            skills: vec!["rust".to_string()],
            experience_years: experience,
            base_rate: RateCard::default(),
            availability: Availability::default(),
            approved: true,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn save_and_find_round_trip() {
        let store = InMemoryTeamStore::new();
        let team = Team::new(
            Uuid::new_v4(),
            "Data migration".to_string(),
            None,
            TeamRequirements::default(),
            BillingPeriod::Hourly,
        )
        .unwrap();

        store.save(&team).await.unwrap();
        let found = store.find_by_id(team.id()).await.unwrap().unwrap();
        assert_eq!(found.id(), team.id());
        assert_eq!(store.count_by_client(team.client()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn delete_reports_whether_anything_matched() {
        let store = InMemoryTeamStore::new();
        assert!(!store.delete(Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn directory_orders_by_experience_then_recency() {
        let directory = InMemoryConsultantDirectory::new();
        let junior = consultant(2);
        let senior = consultant(9);
        directory.insert(junior.clone()).await;
        directory.insert(senior.clone()).await;

        let found = directory
            .find_many(&ConsultantFilter::default())
            .await
            .unwrap();
        assert_eq!(found[0].id, senior.id);
        assert_eq!(found[1].id, junior.id);
    }

    #[tokio::test]
    async fn directory_applies_skip_and_limit() {
        let directory = InMemoryConsultantDirectory::new();
        for experience in 1..=5 {
            directory.insert(consultant(experience)).await;
        }

        let filter = ConsultantFilter {
            skip: 1,
            limit: Some(2),
            ..ConsultantFilter::default()
        };
        let found = directory.find_many(&filter).await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].experience_years, 4);
    }
}
