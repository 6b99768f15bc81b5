use rust_decimal::Decimal;

use crate::domain::consultant::RateCard;
use crate::domain::team::value_objects::BillingPeriod;

const HOURS_PER_DAY: i64 = 8;
const HOURS_PER_WEEK: i64 = 40;

/// Resolves the per-unit rate a consultant bills at for a billing period
///
/// Explicit daily/weekly rates win when present; otherwise they are derived
/// from the hourly rate (daily = hourly x 8, weekly = hourly x 40). A card
/// with no hourly rate resolves to zero rather than erroring, leaving the
/// member unpriced.
///
/// Pure function of its inputs.
pub fn rate_for_period(card: &RateCard, period: BillingPeriod) -> Decimal {
    let hourly = card.hourly.unwrap_or(Decimal::ZERO);
    match period {
        BillingPeriod::Hourly => hourly,
        BillingPeriod::Daily => card
            .daily
            .unwrap_or_else(|| hourly * Decimal::from(HOURS_PER_DAY)),
        BillingPeriod::Weekly => card
            .weekly
            .unwrap_or_else(|| hourly * Decimal::from(HOURS_PER_WEEK)),
    }
}
