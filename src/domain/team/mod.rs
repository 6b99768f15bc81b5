// Team domain module
// Aggregate root, value objects, and the edit-patch DTOs

#![allow(clippy::module_inception)]

pub mod team;
pub mod value_objects;

pub use team::{MemberPatch, Team, TeamPatch, MAX_MEMBERS_PER_TEAM, MAX_TEAMS_PER_CLIENT};
pub use value_objects::{
    BillingPeriod, ConsultantRef, Money, PricingSnapshot, ProjectDuration, TeamMember,
    TeamRequirements, TeamStatus,
};
