use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-period rates a consultant advertises
///
/// Only the hourly rate is commonly present; missing daily/weekly rates are
/// derived from hourly at computation time and never written back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateCard {
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub hourly: Option<Decimal>,
    #[serde(default)]
    pub daily: Option<Decimal>,
    #[serde(default)]
    pub weekly: Option<Decimal>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Availability {
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default = "default_remote")]
    pub remote: bool,
}

fn default_remote() -> bool {
    true
}

/// Display fields of the identity owning a consultant profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Consultant profile as read from the directory
///
/// Read-only to this core: lookups and filtered listings only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consultant {
    pub id: Uuid,
    #[serde(default)]
    pub user: UserSummary,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience_years: u32,
    #[serde(default)]
    pub base_rate: RateCard,
    #[serde(default)]
    pub availability: Availability,
    #[serde(default)]
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}

impl Consultant {
    /// The consultant's first declared role, used to default a member's role
    pub fn default_role(&self) -> String {
        self.roles.first().cloned().unwrap_or_default()
    }
}

/// Filter for directory listings
///
/// Supports approval state, id in/not-in sets, skill membership, minimum
/// experience, timezone, remote flag and a maximum hourly rate, plus
/// skip/limit pagination. Results are ordered by experience (desc), then
/// recency (desc).
#[derive(Debug, Clone, Default)]
pub struct ConsultantFilter {
    pub approved: Option<bool>,
    pub ids: Option<Vec<Uuid>>,
    pub exclude_ids: Vec<Uuid>,
    pub skills_any: Vec<String>,
    pub min_experience: Option<u32>,
    pub timezone: Option<String>,
    pub remote: Option<bool>,
    pub max_hourly_rate: Option<Decimal>,
    pub skip: usize,
    pub limit: Option<usize>,
}

impl ConsultantFilter {
    /// Filter for approved consultants among the given ids
    pub fn approved_in(ids: Vec<Uuid>) -> Self {
        Self {
            approved: Some(true),
            ids: Some(ids),
            ..Self::default()
        }
    }

    /// Whether a consultant record satisfies every criterion of this filter
    ///
    /// Pagination fields are not considered; they apply to the result set.
    pub fn matches(&self, consultant: &Consultant) -> bool {
        if let Some(approved) = self.approved {
            if consultant.approved != approved {
                return false;
            }
        }
        if let Some(ids) = &self.ids {
            if !ids.contains(&consultant.id) {
                return false;
            }
        }
        if self.exclude_ids.contains(&consultant.id) {
            return false;
        }
        if !self.skills_any.is_empty()
            && !self
                .skills_any
                .iter()
                .any(|skill| consultant.skills.contains(skill))
        {
            return false;
        }
        if let Some(min) = self.min_experience {
            if consultant.experience_years < min {
                return false;
            }
        }
        if let Some(timezone) = &self.timezone {
            if consultant.availability.timezone.as_deref() != Some(timezone.as_str()) {
                return false;
            }
        }
        if let Some(remote) = self.remote {
            if consultant.availability.remote != remote {
                return false;
            }
        }
        if let Some(max_rate) = self.max_hourly_rate {
            match consultant.base_rate.hourly {
                Some(hourly) if hourly <= max_rate => {}
                _ => return false,
            }
        }
        true
    }
}
