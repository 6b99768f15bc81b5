use std::collections::HashMap;

use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

use crate::domain::consultant::Consultant;
use crate::domain::pricing::duration::billing_units;
use crate::domain::pricing::rates::rate_for_period;
use crate::domain::team::value_objects::{
    BillingPeriod, PricingSnapshot, ProjectDuration, TeamMember,
};

const DEFAULT_CURRENCY: &str = "USD";

/// Discount and tax percentages applied to a quote
#[derive(Debug, Clone, Copy, Default)]
pub struct PricingOptions {
    pub tax_percent: Decimal,
    pub discount_percent: Decimal,
}

/// Rounds to 2 decimal places, half away from zero (currency minor units)
fn round2(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Computes a pricing snapshot for a member roster
///
/// Pure: the caller batch-loads the referenced consultants and passes them
/// in. Members whose consultant id is absent from `consultants` are skipped
/// rather than failing the quote; a stale reference must never block an
/// otherwise-valid quote.
///
/// The unit count is resolved once for the whole roster from the billing
/// period and project duration. Each member contributes
/// `rate x units x allocation / 100`. Discount applies to the rounded
/// subtotal, tax to the discounted amount, and every monetary field is
/// rounded independently.
pub fn compute_pricing(
    members: &[TeamMember],
    period: BillingPeriod,
    duration: &ProjectDuration,
    currency_hint: Option<&str>,
    consultants: &HashMap<Uuid, Consultant>,
    options: &PricingOptions,
) -> PricingSnapshot {
    if members.is_empty() {
        return PricingSnapshot::zero(currency_hint.unwrap_or(DEFAULT_CURRENCY));
    }

    let units = billing_units(period, duration);

    let mut subtotal = Decimal::ZERO;
    let mut currency = currency_hint.map(str::to_string);

    for member in members {
        let Some(consultant) = consultants.get(&member.consultant) else {
            continue;
        };

        let rate = rate_for_period(&consultant.base_rate, period);
        let allocation_factor = Decimal::from(member.allocation) / Decimal::ONE_HUNDRED;
        subtotal += rate * units * allocation_factor;

        if currency.is_none() {
            if let Some(card_currency) = &consultant.base_rate.currency {
                currency = Some(card_currency.clone());
            }
        }
    }

    let subtotal = round2(subtotal);
    let discount = round2(subtotal * options.discount_percent / Decimal::ONE_HUNDRED);
    let after_discount = subtotal - discount;
    let tax = round2(after_discount * options.tax_percent / Decimal::ONE_HUNDRED);
    let total = round2(after_discount + tax);

    PricingSnapshot {
        currency: currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        subtotal,
        discount,
        tax,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::consultant::{Availability, RateCard, UserSummary};
    use chrono::{TimeZone, Utc};

    fn consultant(id: Uuid, hourly: i64) -> Consultant {
        Consultant {
            id,
            user: UserSummary::default(),
            headline: None,
            roles: vec![],
            skills: vec![],
            experience_years: 0,
            base_rate: RateCard {
                currency: Some("USD".to_string()),
                hourly: Some(Decimal::from(hourly)),
                daily: None,
                weekly: None,
            },
            availability: Availability::default(),
            approved: true,
            created_at: Utc::now(),
        }
    }

    fn member(consultant: Uuid, allocation: u8) -> TeamMember {
        TeamMember {
            consultant,
            role: String::new(),
            allocation,
            start_date: None,
            end_date: None,
        }
    }

    fn directory(consultants: Vec<Consultant>) -> HashMap<Uuid, Consultant> {
        consultants.into_iter().map(|c| (c.id, c)).collect()
    }

    #[test]
    fn empty_roster_is_all_zero() {
        let snapshot = compute_pricing(
            &[],
            BillingPeriod::Hourly,
            &ProjectDuration::default(),
            Some("EUR"),
            &HashMap::new(),
            &PricingOptions::default(),
        );
        assert_eq!(snapshot, PricingSnapshot::zero("EUR"));
    }

    #[test]
    fn single_member_default_unit_quote() {
        let id = Uuid::new_v4();
        let snapshot = compute_pricing(
            &[member(id, 100)],
            BillingPeriod::Hourly,
            &ProjectDuration::default(),
            None,
            &directory(vec![consultant(id, 50)]),
            &PricingOptions::default(),
        );
        assert_eq!(snapshot.subtotal, Decimal::from(50));
        assert_eq!(snapshot.total, Decimal::from(50));
        assert_eq!(snapshot.currency, "USD");
    }

    #[test]
    fn discount_then_tax_chain() {
        let id = Uuid::new_v4();
        let consultants = directory(vec![consultant(id, 50)]);
        let members = [member(id, 100)];
        let duration = ProjectDuration::default();

        let discounted = compute_pricing(
            &members,
            BillingPeriod::Hourly,
            &duration,
            None,
            &consultants,
            &PricingOptions {
                discount_percent: Decimal::from(10),
                tax_percent: Decimal::ZERO,
            },
        );
        assert_eq!(discounted.discount, Decimal::from(5));
        assert_eq!(discounted.total, Decimal::from(45));

        let taxed = compute_pricing(
            &members,
            BillingPeriod::Hourly,
            &duration,
            None,
            &consultants,
            &PricingOptions {
                discount_percent: Decimal::from(10),
                tax_percent: Decimal::from(10),
            },
        );
        // tax applies to the discounted amount: 45 * 10% = 4.5
        assert_eq!(taxed.tax, Decimal::new(45, 1));
        assert_eq!(taxed.total, Decimal::new(495, 1));
    }

    #[test]
    fn daily_allocation_scenario() {
        let id = Uuid::new_v4();
        let mut c = consultant(id, 0);
        c.base_rate.daily = Some(Decimal::from(200));
        let duration = ProjectDuration {
            start_date: Some(Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap()),
            end_date: Some(Utc.with_ymd_and_hms(2026, 3, 6, 0, 0, 0).unwrap()),
            estimated_hours: None,
        };
        let snapshot = compute_pricing(
            &[member(id, 50)],
            BillingPeriod::Daily,
            &duration,
            None,
            &directory(vec![c]),
            &PricingOptions::default(),
        );
        // 5 inclusive days x 200 x 0.5
        assert_eq!(snapshot.subtotal, Decimal::from(500));
        assert_eq!(snapshot.total, Decimal::from(500));
    }

    #[test]
    fn unresolvable_member_is_skipped() {
        let id = Uuid::new_v4();
        let snapshot = compute_pricing(
            &[member(id, 100), member(Uuid::new_v4(), 100)],
            BillingPeriod::Hourly,
            &ProjectDuration::default(),
            None,
            &directory(vec![consultant(id, 50)]),
            &PricingOptions::default(),
        );
        assert_eq!(snapshot.subtotal, Decimal::from(50));
    }

    #[test]
    fn currency_adopted_from_first_resolvable_member() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let mut a = consultant(first, 50);
        a.base_rate.currency = Some("GBP".to_string());
        let mut b = consultant(second, 60);
        b.base_rate.currency = Some("EUR".to_string());

        let snapshot = compute_pricing(
            &[member(first, 100), member(second, 100)],
            BillingPeriod::Hourly,
            &ProjectDuration::default(),
            None,
            &directory(vec![a, b]),
            &PricingOptions::default(),
        );
        assert_eq!(snapshot.currency, "GBP");
    }

    #[test]
    fn configured_currency_wins_over_member_currency() {
        let id = Uuid::new_v4();
        let mut c = consultant(id, 50);
        c.base_rate.currency = Some("EUR".to_string());
        let snapshot = compute_pricing(
            &[member(id, 100)],
            BillingPeriod::Hourly,
            &ProjectDuration::default(),
            Some("CAD"),
            &directory(vec![c]),
            &PricingOptions::default(),
        );
        assert_eq!(snapshot.currency, "CAD");
    }

    #[test]
    fn independent_rounding_discrepancy_stays_within_one_minor_unit() {
        let id = Uuid::new_v4();
        let mut c = consultant(id, 0);
        // An awkward rate so every boundary actually rounds
        c.base_rate.hourly = Some(Decimal::new(3333, 2)); // 33.33
        let snapshot = compute_pricing(
            &[member(id, 33)],
            BillingPeriod::Hourly,
            &ProjectDuration::default(),
            None,
            &directory(vec![c]),
            &PricingOptions {
                discount_percent: Decimal::new(75, 1), // 7.5%
                tax_percent: Decimal::new(125, 1),     // 12.5%
            },
        );

        let recombined = snapshot.subtotal - snapshot.discount + snapshot.tax;
        let drift = (recombined - snapshot.total).abs();
        assert!(drift <= Decimal::new(1, 2), "drift was {drift}");
        assert!(snapshot.subtotal >= Decimal::ZERO);
    }
}
