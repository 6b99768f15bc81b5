// API layer module (adapters for controllers)
// Follows Hexagonal Architecture - API is an adapter

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::services::TeamSelectionService;

pub mod errors;
pub mod handlers;
pub mod middleware;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TeamSelectionService>,
}

/// Builds the full route table over the given state
///
/// Used by `main` and by the HTTP integration tests, so both always agree
/// on the surface.
pub fn router(state: AppState) -> Router {
    use handlers::teams;

    Router::new()
        .route("/health", get(handlers::health_check))
        // Public share route - no auth required
        .route(
            "/api/teams/shared/:share_link_id",
            get(teams::get_shared_team),
        )
        // Team lifecycle
        .route("/api/teams", post(teams::create_team))
        .route("/api/teams", get(teams::list_teams))
        .route("/api/teams/:team_id", get(teams::get_team))
        .route("/api/teams/:team_id", put(teams::update_team))
        .route("/api/teams/:team_id", delete(teams::delete_team))
        // Membership
        .route("/api/teams/:team_id/members", post(teams::add_member))
        .route("/api/teams/:team_id/members/bulk", post(teams::add_members))
        .route(
            "/api/teams/:team_id/members/:consultant_id",
            put(teams::update_member),
        )
        .route(
            "/api/teams/:team_id/members/:consultant_id",
            delete(teams::remove_member),
        )
        // Recommendations, quotes, sharing
        .route(
            "/api/teams/:team_id/recommendations",
            get(teams::get_recommendations),
        )
        .route("/api/teams/:team_id/pricing", post(teams::team_pricing))
        .route("/api/teams/pricing/calculate", post(teams::live_pricing))
        .route("/api/teams/:team_id/share", post(teams::generate_share_link))
        .with_state(state)
}
