use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::middleware::JwtAuth;
use crate::api::AppState;
use crate::domain::consultant::Consultant;
use crate::domain::pricing::PricingOptions;
use crate::domain::team::{
    BillingPeriod, MemberPatch, Money, PricingSnapshot, ProjectDuration, Team, TeamPatch,
    TeamRequirements, TeamStatus,
};
use crate::services::team_selection::{CreateTeamInput, LiveQuoteInput, MemberInput};

/// Consultant reference as rendered on a team read
///
/// Resolved to the full directory record (including the owning user's
/// display fields) when it still exists; a stale reference falls back to
/// the bare id.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ConsultantView {
    Resolved(Box<Consultant>),
    Reference(Uuid),
}

#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub consultant: ConsultantView,
    pub role: String,
    pub allocation: u8,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Team representation returned by every team-shaped endpoint
#[derive(Debug, Serialize)]
pub struct TeamResponse {
    pub id: Uuid,
    pub client: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub members: Vec<MemberResponse>,
    pub billing_period: BillingPeriod,
    pub project_duration: ProjectDuration,
    pub requirements: TeamRequirements,
    pub total_budget: Option<Money>,
    pub pricing_snapshot: PricingSnapshot,
    pub status: TeamStatus,
    pub share_link_id: Option<String>,
    pub is_shared: bool,
    pub share_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TeamResponse {
    /// Builds the response, resolving member references against `consultants`
    pub fn new(team: &Team, consultants: &HashMap<Uuid, Consultant>) -> Self {
        let members = team
            .members()
            .iter()
            .map(|member| MemberResponse {
                consultant: match consultants.get(&member.consultant) {
                    Some(found) => ConsultantView::Resolved(Box::new(found.clone())),
                    None => ConsultantView::Reference(member.consultant),
                },
                role: member.role.clone(),
                allocation: member.allocation,
                start_date: member.start_date,
                end_date: member.end_date,
            })
            .collect();

        Self {
            id: team.id(),
            client: team.client(),
            name: team.name().to_string(),
            description: team.description().map(str::to_string),
            members,
            billing_period: team.billing_period(),
            project_duration: team.project_duration().clone(),
            requirements: team.requirements().clone(),
            total_budget: team.total_budget().cloned(),
            pricing_snapshot: team.pricing_snapshot().clone(),
            status: team.status(),
            share_link_id: team.share_link_id().map(str::to_string),
            is_shared: team.is_shared(),
            share_expires_at: team.share_expires_at(),
            created_at: team.created_at(),
            updated_at: team.updated_at(),
        }
    }
}

impl From<&Team> for TeamResponse {
    fn from(team: &Team) -> Self {
        Self::new(team, &HashMap::new())
    }
}

#[derive(Debug, Deserialize)]
pub struct ListTeamsQuery {
    pub status: Option<TeamStatus>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct TeamListResponse {
    pub teams: Vec<TeamResponse>,
    pub total: u64,
    pub page: usize,
    pub limit: usize,
    pub total_pages: u64,
}

/// Update request: the allow-listed patch plus quote percentages
#[derive(Debug, Deserialize)]
pub struct UpdateTeamRequest {
    #[serde(flatten)]
    pub patch: TeamPatch,
    #[serde(default)]
    pub tax_percent: Option<Decimal>,
    #[serde(default)]
    pub discount_percent: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub struct AddMembersRequest {
    #[serde(default)]
    pub members: Vec<MemberInput>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PricingRequest {
    #[serde(default)]
    pub tax_percent: Option<Decimal>,
    #[serde(default)]
    pub discount_percent: Option<Decimal>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ShareRequest {
    #[serde(default)]
    pub expires_in_days: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ShareLinkResponse {
    pub share_link_id: String,
    pub share_expires_at: Option<DateTime<Utc>>,
}

fn pricing_options(tax: Option<Decimal>, discount: Option<Decimal>) -> PricingOptions {
    PricingOptions {
        tax_percent: tax.unwrap_or_default(),
        discount_percent: discount.unwrap_or_default(),
    }
}

/// Create a new team
///
/// POST /api/teams
pub async fn create_team(
    State(state): State<AppState>,
    JwtAuth(actor): JwtAuth,
    Json(req): Json<CreateTeamInput>,
) -> Result<(StatusCode, Json<TeamResponse>), ApiError> {
    let team = state.service.create_team(actor, req).await?;
    Ok((StatusCode::CREATED, Json(TeamResponse::from(&team))))
}

/// List the acting client's teams
///
/// GET /api/teams?status=&page=&limit=
pub async fn list_teams(
    State(state): State<AppState>,
    JwtAuth(actor): JwtAuth,
    Query(query): Query<ListTeamsQuery>,
) -> Result<Json<TeamListResponse>, ApiError> {
    let listing = state
        .service
        .list_client_teams(
            actor,
            query.status,
            query.page.unwrap_or(1),
            query.limit.unwrap_or(25),
        )
        .await?;

    Ok(Json(TeamListResponse {
        teams: listing.teams.iter().map(TeamResponse::from).collect(),
        total: listing.total,
        page: listing.page,
        limit: listing.limit,
        total_pages: listing.total_pages,
    }))
}

/// Get a team by ID (owner only), members resolved to consultant records
///
/// GET /api/teams/:team_id
pub async fn get_team(
    State(state): State<AppState>,
    JwtAuth(actor): JwtAuth,
    Path(team_id): Path<Uuid>,
) -> Result<Json<TeamResponse>, ApiError> {
    let detail = state.service.get_team(team_id, actor).await?;
    Ok(Json(TeamResponse::new(&detail.team, &detail.consultants)))
}

/// Update allow-listed team fields, then reprice
///
/// PUT /api/teams/:team_id
pub async fn update_team(
    State(state): State<AppState>,
    JwtAuth(actor): JwtAuth,
    Path(team_id): Path<Uuid>,
    Json(req): Json<UpdateTeamRequest>,
) -> Result<Json<TeamResponse>, ApiError> {
    let team = state
        .service
        .update_team(
            team_id,
            actor,
            req.patch,
            pricing_options(req.tax_percent, req.discount_percent),
        )
        .await?;
    Ok(Json(TeamResponse::from(&team)))
}

/// Delete a team
///
/// DELETE /api/teams/:team_id
pub async fn delete_team(
    State(state): State<AppState>,
    JwtAuth(actor): JwtAuth,
    Path(team_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.service.delete_team(team_id, actor).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Add a single member
///
/// POST /api/teams/:team_id/members
pub async fn add_member(
    State(state): State<AppState>,
    JwtAuth(actor): JwtAuth,
    Path(team_id): Path<Uuid>,
    Json(req): Json<MemberInput>,
) -> Result<Json<TeamResponse>, ApiError> {
    let team = state.service.add_member(team_id, actor, req).await?;
    Ok(Json(TeamResponse::from(&team)))
}

/// Add a batch of members atomically
///
/// POST /api/teams/:team_id/members/bulk
pub async fn add_members(
    State(state): State<AppState>,
    JwtAuth(actor): JwtAuth,
    Path(team_id): Path<Uuid>,
    Json(req): Json<AddMembersRequest>,
) -> Result<Json<TeamResponse>, ApiError> {
    let team = state.service.add_members(team_id, actor, req.members).await?;
    Ok(Json(TeamResponse::from(&team)))
}

/// Update a member's allow-listed fields
///
/// PUT /api/teams/:team_id/members/:consultant_id
pub async fn update_member(
    State(state): State<AppState>,
    JwtAuth(actor): JwtAuth,
    Path((team_id, consultant_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<MemberPatch>,
) -> Result<Json<TeamResponse>, ApiError> {
    let team = state
        .service
        .update_member(team_id, actor, consultant_id, req)
        .await?;
    Ok(Json(TeamResponse::from(&team)))
}

/// Remove a member
///
/// DELETE /api/teams/:team_id/members/:consultant_id
pub async fn remove_member(
    State(state): State<AppState>,
    JwtAuth(actor): JwtAuth,
    Path((team_id, consultant_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<TeamResponse>, ApiError> {
    let team = state
        .service
        .remove_member(team_id, actor, consultant_id)
        .await?;
    Ok(Json(TeamResponse::from(&team)))
}

/// Approved consultants matching the team's requirements
///
/// GET /api/teams/:team_id/recommendations
pub async fn get_recommendations(
    State(state): State<AppState>,
    JwtAuth(actor): JwtAuth,
    Path(team_id): Path<Uuid>,
) -> Result<Json<Vec<Consultant>>, ApiError> {
    let consultants = state
        .service
        .get_recommended_consultants(team_id, actor)
        .await?;
    Ok(Json(consultants))
}

/// Read-only quote for a persisted team
///
/// POST /api/teams/:team_id/pricing
pub async fn team_pricing(
    State(state): State<AppState>,
    JwtAuth(actor): JwtAuth,
    Path(team_id): Path<Uuid>,
    Json(req): Json<PricingRequest>,
) -> Result<Json<PricingSnapshot>, ApiError> {
    let snapshot = state
        .service
        .pricing_for_team(
            team_id,
            actor,
            pricing_options(req.tax_percent, req.discount_percent),
        )
        .await?;
    Ok(Json(snapshot))
}

/// Quote for an inline, not-yet-persisted roster
///
/// POST /api/teams/pricing/calculate
pub async fn live_pricing(
    State(state): State<AppState>,
    JwtAuth(_actor): JwtAuth,
    Json(req): Json<LiveQuoteInput>,
) -> Result<Json<PricingSnapshot>, ApiError> {
    let snapshot = state.service.live_pricing(req).await?;
    Ok(Json(snapshot))
}

/// Issue a read-only share link
///
/// POST /api/teams/:team_id/share
pub async fn generate_share_link(
    State(state): State<AppState>,
    JwtAuth(actor): JwtAuth,
    Path(team_id): Path<Uuid>,
    Json(req): Json<ShareRequest>,
) -> Result<Json<ShareLinkResponse>, ApiError> {
    let link = state
        .service
        .generate_share_link(team_id, actor, req.expires_in_days)
        .await?;
    Ok(Json(ShareLinkResponse {
        share_link_id: link.share_link_id,
        share_expires_at: link.share_expires_at,
    }))
}

/// Public lookup of a shared team
///
/// GET /api/teams/shared/:share_link_id
pub async fn get_shared_team(
    State(state): State<AppState>,
    Path(share_link_id): Path<String>,
) -> Result<Json<TeamResponse>, ApiError> {
    let detail = state.service.get_shared_team(&share_link_id).await?;
    Ok(Json(TeamResponse::new(&detail.team, &detail.consultants)))
}
