use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::consultant::{Consultant, ConsultantFilter};
use crate::domain::errors::{TeamError, TeamResult};
use crate::domain::pricing::{compute_pricing, PricingOptions};
use crate::domain::repositories::{ConsultantDirectory, TeamStore};
use crate::domain::team::{
    BillingPeriod, ConsultantRef, MemberPatch, PricingSnapshot, ProjectDuration, Team, TeamMember,
    TeamPatch, TeamRequirements, TeamStatus, MAX_TEAMS_PER_CLIENT,
};
use crate::notify::{PricingNotifier, PricingUpdate};

const RECOMMENDATION_LIMIT: usize = 20;
const DEFAULT_SHARE_EXPIRY_DAYS: i64 = 30;

/// Input for creating a team
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTeamInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub requirements: Option<TeamRequirements>,
    #[serde(default)]
    pub billing_period: Option<BillingPeriod>,
}

/// Input for one member assignment
#[derive(Debug, Clone, Deserialize)]
pub struct MemberInput {
    pub consultant: ConsultantRef,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub allocation: Option<u8>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

impl MemberInput {
    /// Builds the member value object, defaulting role and allocation
    fn into_member(self, consultant: Option<&Consultant>) -> TeamMember {
        let role = match self.role {
            Some(role) if !role.is_empty() => role,
            _ => consultant.map(Consultant::default_role).unwrap_or_default(),
        };
        TeamMember {
            consultant: self.consultant.id(),
            role,
            allocation: self.allocation.unwrap_or(100),
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// Input for a live, store-independent quote
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LiveQuoteInput {
    #[serde(default)]
    pub members: Vec<MemberInput>,
    #[serde(default)]
    pub billing_period: Option<BillingPeriod>,
    #[serde(default)]
    pub project_duration: Option<ProjectDuration>,
    #[serde(default)]
    pub tax_percent: Option<Decimal>,
    #[serde(default)]
    pub discount_percent: Option<Decimal>,
}

/// One page of a client's teams
#[derive(Debug, Clone)]
pub struct TeamListing {
    pub teams: Vec<Team>,
    pub total: u64,
    pub page: usize,
    pub limit: usize,
    pub total_pages: u64,
}

/// Result of issuing a share link
#[derive(Debug, Clone)]
pub struct ShareLink {
    pub share_link_id: String,
    pub share_expires_at: Option<DateTime<Utc>>,
}

/// A team together with the directory records its members reference
///
/// Returned by the read operations so callers can render who the roster
/// actually is, not just ids. Stale references are simply absent from the
/// map.
#[derive(Debug, Clone)]
pub struct TeamDetail {
    pub team: Team,
    pub consultants: HashMap<Uuid, Consultant>,
}

/// Team pricing and membership engine
///
/// Owns the full lifecycle of a team aggregate: creation caps, owner-gated
/// mutation, membership invariants, share links, and the
/// recompute-and-persist cycle that keeps the pricing snapshot in sync with
/// every mutation. Collaborators are injected as ports: the team store, the
/// read-only consultant directory, and an optional-by-construction pricing
/// notifier.
pub struct TeamSelectionService {
    teams: Arc<dyn TeamStore>,
    consultants: Arc<dyn ConsultantDirectory>,
    notifier: Arc<dyn PricingNotifier>,
}

impl TeamSelectionService {
    pub fn new(
        teams: Arc<dyn TeamStore>,
        consultants: Arc<dyn ConsultantDirectory>,
        notifier: Arc<dyn PricingNotifier>,
    ) -> Self {
        Self {
            teams,
            consultants,
            notifier,
        }
    }

    // ===== Lifecycle =====

    /// Creates an empty team, enforcing the per-client team cap
    pub async fn create_team(&self, actor: Uuid, input: CreateTeamInput) -> TeamResult<Team> {
        let owned = self
            .teams
            .count_by_client(actor)
            .await
            .map_err(TeamError::Storage)?;
        if owned as usize >= MAX_TEAMS_PER_CLIENT {
            return Err(TeamError::invalid(format!(
                "You can only create up to {MAX_TEAMS_PER_CLIENT} teams"
            )));
        }

        let team = Team::new(
            actor,
            input.name,
            input.description,
            input.requirements.unwrap_or_default(),
            input.billing_period.unwrap_or_default(),
        )?;
        self.teams.save(&team).await.map_err(TeamError::Storage)?;
        Ok(team)
    }

    /// Owner-gated read, with member references resolved to directory records
    pub async fn get_team(&self, team_id: Uuid, actor: Uuid) -> TeamResult<TeamDetail> {
        let team = self.load_owned(team_id, actor).await?;
        let consultants = self.roster_consultants(team.members()).await?;
        Ok(TeamDetail { team, consultants })
    }

    /// A page of the acting client's teams, newest-updated first
    pub async fn list_client_teams(
        &self,
        actor: Uuid,
        status: Option<TeamStatus>,
        page: usize,
        limit: usize,
    ) -> TeamResult<TeamListing> {
        let page = page.max(1);
        let limit = limit.max(1);
        let skip = (page - 1) * limit;

        let result = self
            .teams
            .find_by_client(actor, status, skip, limit)
            .await
            .map_err(TeamError::Storage)?;

        let total_pages = result.total.div_ceil(limit as u64);
        Ok(TeamListing {
            teams: result.teams,
            total: result.total,
            page,
            limit,
            total_pages,
        })
    }

    /// Applies an allow-listed patch, then reprices with the given percents
    pub async fn update_team(
        &self,
        team_id: Uuid,
        actor: Uuid,
        patch: TeamPatch,
        options: PricingOptions,
    ) -> TeamResult<Team> {
        let mut team = self.load_owned(team_id, actor).await?;
        team.apply_patch(patch)?;
        self.reprice_and_save(&mut team, &options).await?;
        Ok(team)
    }

    /// Owner-gated hard delete
    pub async fn delete_team(&self, team_id: Uuid, actor: Uuid) -> TeamResult<()> {
        self.load_owned(team_id, actor).await?;
        let deleted = self
            .teams
            .delete(team_id)
            .await
            .map_err(TeamError::Storage)?;
        if !deleted {
            return Err(TeamError::TeamNotFound);
        }
        Ok(())
    }

    // ===== Membership =====

    /// Adds one member after approval gating, then reprices
    pub async fn add_member(
        &self,
        team_id: Uuid,
        actor: Uuid,
        input: MemberInput,
    ) -> TeamResult<Team> {
        let mut team = self.load_owned(team_id, actor).await?;
        team.check_can_accept(1)?;

        let consultant = self
            .consultants
            .find_by_id(input.consultant.id())
            .await
            .map_err(TeamError::Storage)?
            .ok_or(TeamError::ConsultantNotFound)?;
        if !consultant.approved {
            return Err(TeamError::ConsultantNotApproved);
        }

        team.add_member(input.into_member(Some(&consultant)))?;
        self.reprice_and_save(&mut team, &PricingOptions::default())
            .await?;
        Ok(team)
    }

    /// Adds a batch of members atomically, then reprices once
    pub async fn add_members(
        &self,
        team_id: Uuid,
        actor: Uuid,
        inputs: Vec<MemberInput>,
    ) -> TeamResult<Team> {
        if inputs.is_empty() {
            return Err(TeamError::invalid("Members array is required"));
        }

        let mut team = self.load_owned(team_id, actor).await?;
        team.check_can_accept(inputs.len())?;

        let ids: Vec<Uuid> = inputs.iter().map(|m| m.consultant.id()).collect();
        let approved = self
            .consultants
            .find_many(&ConsultantFilter::approved_in(ids.clone()))
            .await
            .map_err(TeamError::Storage)?;
        if approved.len() != ids.len() {
            return Err(TeamError::ConsultantsNotFound);
        }
        let by_id: HashMap<Uuid, Consultant> = approved.into_iter().map(|c| (c.id, c)).collect();

        if ids.iter().any(|id| team.has_member(*id)) {
            return Err(TeamError::invalid("One or more consultants already in team"));
        }

        let members = inputs
            .into_iter()
            .map(|input| {
                let consultant = by_id.get(&input.consultant.id());
                input.into_member(consultant)
            })
            .collect();
        team.add_members(members)?;

        self.reprice_and_save(&mut team, &PricingOptions::default())
            .await?;
        Ok(team)
    }

    /// Removes a member and reprices over the remaining roster
    pub async fn remove_member(
        &self,
        team_id: Uuid,
        actor: Uuid,
        consultant_id: Uuid,
    ) -> TeamResult<Team> {
        let mut team = self.load_owned(team_id, actor).await?;
        team.remove_member(consultant_id)?;
        self.reprice_and_save(&mut team, &PricingOptions::default())
            .await?;
        Ok(team)
    }

    /// Applies an allow-listed member patch, then reprices
    pub async fn update_member(
        &self,
        team_id: Uuid,
        actor: Uuid,
        consultant_id: Uuid,
        patch: MemberPatch,
    ) -> TeamResult<Team> {
        let mut team = self.load_owned(team_id, actor).await?;
        team.update_member(consultant_id, &patch)?;
        self.reprice_and_save(&mut team, &PricingOptions::default())
            .await?;
        Ok(team)
    }

    // ===== Quotes =====

    /// Read-only quote for a persisted team; the snapshot is not written
    pub async fn pricing_for_team(
        &self,
        team_id: Uuid,
        actor: Uuid,
        options: PricingOptions,
    ) -> TeamResult<PricingSnapshot> {
        let team = self.load_owned(team_id, actor).await?;
        self.price_roster(
            team.members(),
            team.billing_period(),
            team.project_duration(),
            team.currency_hint(),
            &options,
        )
        .await
    }

    /// Quote for an inline, not-yet-persisted roster
    ///
    /// Same resolver, calculator and engine as the persisted path; never
    /// touches the team store, and does not gate on consultant approval —
    /// unresolvable references are simply unpriced.
    pub async fn live_pricing(&self, input: LiveQuoteInput) -> TeamResult<PricingSnapshot> {
        let options = PricingOptions {
            tax_percent: input.tax_percent.unwrap_or_default(),
            discount_percent: input.discount_percent.unwrap_or_default(),
        };
        let members: Vec<TeamMember> = input
            .members
            .into_iter()
            .map(|m| m.into_member(None))
            .collect();
        self.price_roster(
            &members,
            input.billing_period.unwrap_or_default(),
            &input.project_duration.unwrap_or_default(),
            None,
            &options,
        )
        .await
    }

    // ===== Sharing =====

    /// Issues a read-only share link for a team
    ///
    /// The id is best-effort unique: the team id's trailing characters plus
    /// a base-36 time suffix. `expires_in_days = 0` means no expiry.
    pub async fn generate_share_link(
        &self,
        team_id: Uuid,
        actor: Uuid,
        expires_in_days: Option<i64>,
    ) -> TeamResult<ShareLink> {
        let mut team = self.load_owned(team_id, actor).await?;

        let uuid_tail: String = {
            let simple = team.id().simple().to_string();
            simple[simple.len() - 6..].to_string()
        };
        let time_tail: String = {
            let encoded = base36(Utc::now().timestamp_millis().max(0) as u64);
            let start = encoded.len().saturating_sub(6);
            encoded[start..].to_string()
        };
        let link_id = format!("{uuid_tail}-{time_tail}");

        let days = expires_in_days.unwrap_or(DEFAULT_SHARE_EXPIRY_DAYS);
        let expires_at = (days > 0).then(|| Utc::now() + Duration::days(days));

        team.enable_sharing(link_id.clone(), expires_at);
        self.teams.save(&team).await.map_err(TeamError::Storage)?;

        Ok(ShareLink {
            share_link_id: link_id,
            share_expires_at: expires_at,
        })
    }

    /// Public lookup by share link; expired links never return team data
    ///
    /// Members are resolved the same way as in [`Self::get_team`] so a
    /// recipient can see who the roster is.
    pub async fn get_shared_team(&self, share_link_id: &str) -> TeamResult<TeamDetail> {
        let team = self
            .teams
            .find_by_share_link(share_link_id)
            .await
            .map_err(TeamError::Storage)?
            .filter(Team::is_shared)
            .ok_or(TeamError::SharedTeamNotFound)?;

        if team.share_expired(Utc::now()) {
            return Err(TeamError::ShareLinkExpired);
        }

        let consultants = self.roster_consultants(team.members()).await?;
        Ok(TeamDetail { team, consultants })
    }

    // ===== Recommendations =====

    /// Approved consultants matching the team's requirements
    ///
    /// Current members are excluded; ordering is experience then recency,
    /// capped at 20. A convenience query, not part of pricing.
    pub async fn get_recommended_consultants(
        &self,
        team_id: Uuid,
        actor: Uuid,
    ) -> TeamResult<Vec<Consultant>> {
        let team = self.load_owned(team_id, actor).await?;
        let requirements = team.requirements();

        let filter = ConsultantFilter {
            approved: Some(true),
            ids: None,
            exclude_ids: team.members().iter().map(|m| m.consultant).collect(),
            skills_any: requirements.skills.clone(),
            min_experience: requirements.min_experience.filter(|min| *min > 0),
            timezone: requirements.preferred_timezone.clone(),
            remote: requirements.remote,
            max_hourly_rate: requirements
                .max_hourly_rate
                .filter(|rate| *rate > Decimal::ZERO),
            skip: 0,
            limit: Some(RECOMMENDATION_LIMIT),
        };

        self.consultants
            .find_many(&filter)
            .await
            .map_err(TeamError::Storage)
    }

    // ===== Internals =====

    async fn load_owned(&self, team_id: Uuid, actor: Uuid) -> TeamResult<Team> {
        let team = self
            .teams
            .find_by_id(team_id)
            .await
            .map_err(TeamError::Storage)?
            .ok_or(TeamError::TeamNotFound)?;
        team.ensure_owned_by(actor)?;
        Ok(team)
    }

    /// Batch-loads the directory records a roster references, keyed by id
    ///
    /// Shared by the read and pricing paths; dangling references yield no
    /// entry rather than an error.
    async fn roster_consultants(
        &self,
        members: &[TeamMember],
    ) -> TeamResult<HashMap<Uuid, Consultant>> {
        if members.is_empty() {
            return Ok(HashMap::new());
        }

        let ids: Vec<Uuid> = members.iter().map(|m| m.consultant).collect();
        let found = self
            .consultants
            .find_many(&ConsultantFilter {
                ids: Some(ids),
                ..ConsultantFilter::default()
            })
            .await
            .map_err(TeamError::Storage)?;
        Ok(found.into_iter().map(|c| (c.id, c)).collect())
    }

    /// Batch-loads the referenced consultants and runs the pure engine
    async fn price_roster(
        &self,
        members: &[TeamMember],
        period: BillingPeriod,
        duration: &ProjectDuration,
        currency_hint: Option<&str>,
        options: &PricingOptions,
    ) -> TeamResult<PricingSnapshot> {
        let by_id = self.roster_consultants(members).await?;
        Ok(compute_pricing(
            members,
            period,
            duration,
            currency_hint,
            &by_id,
            options,
        ))
    }

    /// Recompute the snapshot, persist the aggregate, announce the update
    ///
    /// Every mutating operation funnels through here so the persisted
    /// snapshot can never drift from the roster. The notification is
    /// fire-and-forget by contract.
    async fn reprice_and_save(&self, team: &mut Team, options: &PricingOptions) -> TeamResult<()> {
        let snapshot = self
            .price_roster(
                team.members(),
                team.billing_period(),
                team.project_duration(),
                team.currency_hint(),
                options,
            )
            .await?;
        team.record_pricing(snapshot.clone());
        self.teams.save(team).await.map_err(TeamError::Storage)?;

        self.notifier
            .pricing_updated(PricingUpdate {
                team_id: team.id(),
                pricing: snapshot,
            })
            .await;
        Ok(())
    }
}

fn base36(mut value: u64) -> String {
    const DIGITS: [char; 36] = [
        '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h',
        'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
    ];
    if value == 0 {
        return "0".to_string();
    }
    let mut out = String::new();
    while value > 0 {
        out.insert(0, DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out
}
