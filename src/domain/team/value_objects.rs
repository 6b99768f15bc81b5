use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unit of time a team's pricing is denominated in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BillingPeriod {
    #[default]
    Hourly,
    Daily,
    Weekly,
}

impl std::fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BillingPeriod::Hourly => write!(f, "hourly"),
            BillingPeriod::Daily => write!(f, "daily"),
            BillingPeriod::Weekly => write!(f, "weekly"),
        }
    }
}

/// Client-editable lifecycle tag
///
/// Purely informational: no transition rules, and no side effects in this
/// core. Clients move teams through these states as their engagement
/// progresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TeamStatus {
    #[default]
    Draft,
    Submitted,
    Approved,
    Active,
    Completed,
    Cancelled,
}

impl std::fmt::Display for TeamStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamStatus::Draft => write!(f, "draft"),
            TeamStatus::Submitted => write!(f, "submitted"),
            TeamStatus::Approved => write!(f, "approved"),
            TeamStatus::Active => write!(f, "active"),
            TeamStatus::Completed => write!(f, "completed"),
            TeamStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A currency-tagged amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Money {
    pub currency: String,
    pub amount: Decimal,
}

impl Default for Money {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            amount: Decimal::ZERO,
        }
    }
}

/// Cached result of the pricing engine, persisted on the team
///
/// All four monetary fields are independently rounded to 2 decimal places,
/// so `subtotal - discount + tax` may differ from `total` by at most one
/// minor currency unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingSnapshot {
    pub currency: String,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl PricingSnapshot {
    /// An all-zero snapshot in the given currency
    pub fn zero(currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
            subtotal: Decimal::ZERO,
            discount: Decimal::ZERO,
            tax: Decimal::ZERO,
            total: Decimal::ZERO,
        }
    }
}

impl Default for PricingSnapshot {
    fn default() -> Self {
        Self::zero("USD")
    }
}

/// Project date range and/or explicit hour estimate
///
/// `estimated_hours` only participates in unit counting for hourly billing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectDuration {
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub estimated_hours: Option<Decimal>,
}

/// Desired consultant attributes, used only for recommendation filtering
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamRequirements {
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub min_experience: Option<u32>,
    #[serde(default)]
    pub preferred_timezone: Option<String>,
    #[serde(default)]
    pub remote: Option<bool>,
    #[serde(default)]
    pub max_hourly_rate: Option<Decimal>,
}

/// A consultant assignment embedded in a team
///
/// Not independently addressable; identified within a team by its
/// consultant id. `start_date`/`end_date` are informational and do not
/// affect unit counting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub consultant: Uuid,
    #[serde(default)]
    pub role: String,
    #[serde(default = "default_allocation")]
    pub allocation: u8,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

fn default_allocation() -> u8 {
    100
}

/// Polymorphic consultant reference accepted at the pricing boundary
///
/// Clients send either a bare id or a populated consultant object; both
/// normalize to the canonical id before any directory lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConsultantRef {
    Id(Uuid),
    Embedded(EmbeddedConsultantRef),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddedConsultantRef {
    #[serde(alias = "_id")]
    pub id: Uuid,
}

impl ConsultantRef {
    /// The canonical consultant id
    pub fn id(&self) -> Uuid {
        match self {
            ConsultantRef::Id(id) => *id,
            ConsultantRef::Embedded(obj) => obj.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn billing_period_display() {
        assert_eq!(BillingPeriod::Hourly.to_string(), "hourly");
        assert_eq!(BillingPeriod::Daily.to_string(), "daily");
        assert_eq!(BillingPeriod::Weekly.to_string(), "weekly");
    }

    #[test]
    fn billing_period_serde_lowercase() {
        let period: BillingPeriod = serde_json::from_str("\"weekly\"").unwrap();
        assert_eq!(period, BillingPeriod::Weekly);
        assert_eq!(serde_json::to_string(&period).unwrap(), "\"weekly\"");
    }

    #[test]
    fn status_display() {
        assert_eq!(TeamStatus::Draft.to_string(), "draft");
        assert_eq!(TeamStatus::Cancelled.to_string(), "cancelled");
    }

    #[test]
    fn zero_snapshot() {
        let snapshot = PricingSnapshot::zero("EUR");
        assert_eq!(snapshot.currency, "EUR");
        assert_eq!(snapshot.subtotal, Decimal::ZERO);
        assert_eq!(snapshot.total, Decimal::ZERO);
    }

    #[test]
    fn member_allocation_defaults_to_100() {
        let member: TeamMember =
            serde_json::from_value(serde_json::json!({ "consultant": Uuid::new_v4() })).unwrap();
        assert_eq!(member.allocation, 100);
        assert_eq!(member.role, "");
    }

    #[test]
    fn consultant_ref_from_bare_id() {
        let id = Uuid::new_v4();
        let r: ConsultantRef = serde_json::from_value(serde_json::json!(id)).unwrap();
        assert_eq!(r.id(), id);
    }

    #[test]
    fn consultant_ref_from_populated_object() {
        let id = Uuid::new_v4();
        let r: ConsultantRef =
            serde_json::from_value(serde_json::json!({ "id": id, "name": "Ada" })).unwrap();
        assert_eq!(r.id(), id);

        let r: ConsultantRef = serde_json::from_value(serde_json::json!({ "_id": id })).unwrap();
        assert_eq!(r.id(), id);
    }
}
