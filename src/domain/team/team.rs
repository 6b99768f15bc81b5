use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::{
    BillingPeriod, Money, PricingSnapshot, ProjectDuration, TeamMember, TeamRequirements,
    TeamStatus,
};
use crate::domain::errors::{TeamError, TeamResult};

/// Authoritative composition cap, enforced only by this aggregate
pub const MAX_MEMBERS_PER_TEAM: usize = 3;

/// How many teams a single client may own at once
pub const MAX_TEAMS_PER_CLIENT: usize = 3;

/// Team aggregate root
///
/// A client-curated roster of consultants with an associated price quote.
/// All composition invariants live here:
/// - name is never empty
/// - at most [`MAX_MEMBERS_PER_TEAM`] members
/// - no two members reference the same consultant
/// - allocations are integers in [0, 100]
/// - date ranges (project and per-member) are ordered
///
/// The pricing snapshot is recomputed by the service after every mutation
/// and written back through [`Team::record_pricing`]. Serde derives act as
/// the persistence bypass: repositories rehydrate a team document without
/// re-running invariant checks, the data having been validated on the way
/// in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    id: Uuid,
    client: Uuid,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    members: Vec<TeamMember>,
    #[serde(default)]
    billing_period: BillingPeriod,
    #[serde(default)]
    project_duration: ProjectDuration,
    #[serde(default)]
    requirements: TeamRequirements,
    #[serde(default)]
    total_budget: Option<Money>,
    #[serde(default)]
    pricing_snapshot: PricingSnapshot,
    #[serde(default)]
    status: TeamStatus,
    #[serde(default)]
    share_link_id: Option<String>,
    #[serde(default)]
    is_shared: bool,
    #[serde(default)]
    share_expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Allow-listed team fields a client may edit
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<TeamRequirements>,
    pub status: Option<TeamStatus>,
    pub project_duration: Option<ProjectDuration>,
    pub billing_period: Option<BillingPeriod>,
}

/// Allow-listed member fields a client may edit
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemberPatch {
    pub role: Option<String>,
    pub allocation: Option<u8>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl Team {
    /// Creates an empty team with a zero pricing snapshot
    pub fn new(
        client: Uuid,
        name: String,
        description: Option<String>,
        requirements: TeamRequirements,
        billing_period: BillingPeriod,
    ) -> TeamResult<Self> {
        if name.trim().is_empty() {
            return Err(TeamError::invalid("Team name is required"));
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            client,
            name,
            description,
            members: Vec::new(),
            billing_period,
            project_duration: ProjectDuration::default(),
            requirements,
            total_budget: Some(Money::default()),
            pricing_snapshot: PricingSnapshot::zero("USD"),
            status: TeamStatus::Draft,
            share_link_id: None,
            is_shared: false,
            share_expires_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Verifies the acting identity owns this team
    pub fn ensure_owned_by(&self, actor: Uuid) -> TeamResult<()> {
        if self.client != actor {
            return Err(TeamError::AccessDenied);
        }
        Ok(())
    }

    /// Checks the member cap against the roster plus `additional` newcomers
    ///
    /// The cap is enforced here and nowhere else; callers that want to fail
    /// fast before doing directory lookups use this directly.
    pub fn check_can_accept(&self, additional: usize) -> TeamResult<()> {
        if self.members.len() + additional > MAX_MEMBERS_PER_TEAM {
            let message = if additional > 1 {
                format!(
                    "Adding these members would exceed the {MAX_MEMBERS_PER_TEAM} consultant limit"
                )
            } else {
                format!("A team may contain at most {MAX_MEMBERS_PER_TEAM} consultants")
            };
            return Err(TeamError::InvalidInput(message));
        }
        Ok(())
    }

    /// Appends a member, enforcing the cap and uniqueness invariants
    pub fn add_member(&mut self, member: TeamMember) -> TeamResult<()> {
        self.check_can_accept(1)?;
        if self.has_member(member.consultant) {
            return Err(TeamError::invalid("Consultant already in team"));
        }
        validate_member(&member)?;

        self.members.push(member);
        self.touch();
        Ok(())
    }

    /// Appends a batch of members atomically
    ///
    /// The whole batch is rejected if it would exceed the cap, duplicate an
    /// existing member, or duplicate a consultant within itself.
    pub fn add_members(&mut self, members: Vec<TeamMember>) -> TeamResult<()> {
        self.check_can_accept(members.len())?;

        let mut incoming: Vec<Uuid> = Vec::with_capacity(members.len());
        for member in &members {
            if self.has_member(member.consultant) || incoming.contains(&member.consultant) {
                return Err(TeamError::invalid("One or more consultants already in team"));
            }
            validate_member(member)?;
            incoming.push(member.consultant);
        }

        self.members.extend(members);
        self.touch();
        Ok(())
    }

    /// Removes the member referencing the given consultant
    pub fn remove_member(&mut self, consultant_id: Uuid) -> TeamResult<()> {
        let before = self.members.len();
        self.members.retain(|m| m.consultant != consultant_id);
        if self.members.len() == before {
            return Err(TeamError::MemberNotFound);
        }
        self.touch();
        Ok(())
    }

    /// Applies the present fields of a member patch
    pub fn update_member(&mut self, consultant_id: Uuid, patch: &MemberPatch) -> TeamResult<()> {
        let member = self
            .members
            .iter_mut()
            .find(|m| m.consultant == consultant_id)
            .ok_or(TeamError::MemberNotFound)?;

        if let Some(role) = &patch.role {
            member.role = role.clone();
        }
        if let Some(allocation) = patch.allocation {
            member.allocation = allocation;
        }
        if let Some(start_date) = patch.start_date {
            member.start_date = Some(start_date);
        }
        if let Some(end_date) = patch.end_date {
            member.end_date = Some(end_date);
        }

        let updated = member.clone();
        validate_member(&updated)?;
        self.touch();
        Ok(())
    }

    /// Applies the present fields of a team patch
    pub fn apply_patch(&mut self, patch: TeamPatch) -> TeamResult<()> {
        if let Some(name) = patch.name {
            if name.trim().is_empty() {
                return Err(TeamError::invalid("Team name is required"));
            }
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(requirements) = patch.requirements {
            self.requirements = requirements;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(duration) = patch.project_duration {
            if let (Some(start), Some(end)) = (duration.start_date, duration.end_date) {
                if end < start {
                    return Err(TeamError::invalid(
                        "Project end date must be after start date",
                    ));
                }
            }
            self.project_duration = duration;
        }
        if let Some(period) = patch.billing_period {
            self.billing_period = period;
        }
        self.touch();
        Ok(())
    }

    /// Writes a freshly computed snapshot onto the team
    ///
    /// The budget amount mirrors the snapshot total; the budget currency is
    /// kept once established, otherwise adopted from the snapshot.
    pub fn record_pricing(&mut self, snapshot: PricingSnapshot) {
        let currency = self
            .total_budget
            .as_ref()
            .map(|b| b.currency.clone())
            .unwrap_or_else(|| snapshot.currency.clone());
        self.total_budget = Some(Money {
            currency,
            amount: snapshot.total,
        });
        self.pricing_snapshot = snapshot;
        self.touch();
    }

    /// Enables read-only sharing under the given link id
    pub fn enable_sharing(&mut self, link_id: String, expires_at: Option<DateTime<Utc>>) {
        self.share_link_id = Some(link_id);
        self.is_shared = true;
        self.share_expires_at = expires_at;
        self.touch();
    }

    /// Whether the share link has passed its expiry
    pub fn share_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.share_expires_at, Some(expires_at) if now > expires_at)
    }

    pub fn has_member(&self, consultant_id: Uuid) -> bool {
        self.members.iter().any(|m| m.consultant == consultant_id)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn client(&self) -> Uuid {
        self.client
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn members(&self) -> &[TeamMember] {
        &self.members
    }

    pub fn billing_period(&self) -> BillingPeriod {
        self.billing_period
    }

    pub fn project_duration(&self) -> &ProjectDuration {
        &self.project_duration
    }

    pub fn requirements(&self) -> &TeamRequirements {
        &self.requirements
    }

    pub fn total_budget(&self) -> Option<&Money> {
        self.total_budget.as_ref()
    }

    /// Currency an owner has configured for this team, if any
    pub fn currency_hint(&self) -> Option<&str> {
        self.total_budget.as_ref().map(|b| b.currency.as_str())
    }

    pub fn pricing_snapshot(&self) -> &PricingSnapshot {
        &self.pricing_snapshot
    }

    pub fn status(&self) -> TeamStatus {
        self.status
    }

    pub fn share_link_id(&self) -> Option<&str> {
        self.share_link_id.as_deref()
    }

    pub fn is_shared(&self) -> bool {
        self.is_shared
    }

    pub fn share_expires_at(&self) -> Option<DateTime<Utc>> {
        self.share_expires_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

fn validate_member(member: &TeamMember) -> TeamResult<()> {
    if member.allocation > 100 {
        return Err(TeamError::invalid(
            "Allocation must be an integer between 0 and 100",
        ));
    }
    if let (Some(start), Some(end)) = (member.start_date, member.end_date) {
        if end < start {
            return Err(TeamError::invalid(
                "Member end date must be after start date",
            ));
        }
    }
    Ok(())
}
