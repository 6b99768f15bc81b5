use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::team::value_objects::{BillingPeriod, ProjectDuration};

const MS_PER_WEEK: i64 = 7 * 24 * 60 * 60 * 1000;
const HOURS_PER_DAY: i64 = 8;

/// Number of calendar days covered by a date range, inclusive of both ends
///
/// Dates are truncated to midnight UTC before counting, so a range within a
/// single day counts as 1. Missing either endpoint degrades to a single
/// billing unit. Never returns less than 1.
pub fn inclusive_day_count(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> i64 {
    let (start, end) = match (start, end) {
        (Some(start), Some(end)) => (start, end),
        _ => return 1,
    };
    let days = (end.date_naive() - start.date_naive()).num_days() + 1;
    days.max(1)
}

/// Number of whole weeks needed to cover a date range, rounded up
///
/// An 8-day span therefore bills as 2 weeks. Missing either endpoint
/// degrades to a single billing unit. Never returns less than 1.
pub fn ceiling_week_count(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> i64 {
    let (start, end) = match (start, end) {
        (Some(start), Some(end)) => (start, end),
        _ => return 1,
    };
    let span_ms = end.timestamp_millis() - start.timestamp_millis() + 1;
    let weeks = (span_ms + MS_PER_WEEK - 1).div_euclid(MS_PER_WEEK);
    weeks.max(1)
}

/// Unit count for a whole team over a billing period
///
/// Priority per period:
/// - hourly: explicit `estimated_hours` when positive, else the inclusive
///   day count x 8 when both dates are present, else 1;
/// - daily: the inclusive day count when both dates are present, else 1;
/// - weekly: the ceiling week count when both dates are present, else 1.
pub fn billing_units(period: BillingPeriod, duration: &ProjectDuration) -> Decimal {
    let has_range = duration.start_date.is_some() && duration.end_date.is_some();
    match period {
        BillingPeriod::Hourly => {
            if let Some(hours) = duration.estimated_hours {
                if hours > Decimal::ZERO {
                    return hours;
                }
            }
            if has_range {
                Decimal::from(
                    inclusive_day_count(duration.start_date, duration.end_date) * HOURS_PER_DAY,
                )
            } else {
                Decimal::ONE
            }
        }
        BillingPeriod::Daily => {
            if has_range {
                Decimal::from(inclusive_day_count(duration.start_date, duration.end_date))
            } else {
                Decimal::ONE
            }
        }
        BillingPeriod::Weekly => {
            if has_range {
                Decimal::from(ceiling_week_count(duration.start_date, duration.end_date))
            } else {
                Decimal::ONE
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn same_day_counts_as_one() {
        let d = date(2026, 3, 10);
        assert_eq!(inclusive_day_count(Some(d), Some(d)), 1);
    }

    #[test]
    fn six_day_offset_counts_seven_days() {
        let start = date(2026, 3, 10);
        assert_eq!(
            inclusive_day_count(Some(start), Some(start + Duration::days(6))),
            7
        );
    }

    #[test]
    fn day_count_ignores_time_of_day() {
        let start = date(2026, 3, 10) + Duration::hours(23);
        let end = date(2026, 3, 11) + Duration::hours(1);
        assert_eq!(inclusive_day_count(Some(start), Some(end)), 2);
    }

    #[test]
    fn day_count_never_below_one() {
        let start = date(2026, 3, 10);
        let end = date(2026, 3, 1);
        assert_eq!(inclusive_day_count(Some(start), Some(end)), 1);
        assert_eq!(inclusive_day_count(None, Some(end)), 1);
        assert_eq!(inclusive_day_count(Some(start), None), 1);
    }

    #[test]
    fn eight_day_span_is_two_weeks() {
        let start = date(2026, 3, 1);
        let end = start + Duration::days(7);
        assert_eq!(ceiling_week_count(Some(start), Some(end)), 2);
    }

    #[test]
    fn week_count_never_below_one() {
        let d = date(2026, 3, 1);
        assert_eq!(ceiling_week_count(Some(d), Some(d)), 1);
        assert_eq!(ceiling_week_count(None, None), 1);
        assert_eq!(ceiling_week_count(Some(d), Some(d - Duration::days(3))), 1);
    }

    #[test]
    fn hourly_units_prefer_estimated_hours() {
        let duration = ProjectDuration {
            start_date: Some(date(2026, 3, 1)),
            end_date: Some(date(2026, 3, 5)),
            estimated_hours: Some(Decimal::from(12)),
        };
        assert_eq!(
            billing_units(BillingPeriod::Hourly, &duration),
            Decimal::from(12)
        );
    }

    #[test]
    fn hourly_units_ignore_zero_estimate() {
        let duration = ProjectDuration {
            start_date: Some(date(2026, 3, 1)),
            end_date: Some(date(2026, 3, 5)),
            estimated_hours: Some(Decimal::ZERO),
        };
        // 5 inclusive days x 8 hours
        assert_eq!(
            billing_units(BillingPeriod::Hourly, &duration),
            Decimal::from(40)
        );
    }

    #[test]
    fn hourly_units_default_to_one_without_duration() {
        assert_eq!(
            billing_units(BillingPeriod::Hourly, &ProjectDuration::default()),
            Decimal::ONE
        );
    }

    #[test]
    fn daily_units_from_inclusive_range() {
        let duration = ProjectDuration {
            start_date: Some(date(2026, 3, 1)),
            end_date: Some(date(2026, 3, 5)),
            estimated_hours: None,
        };
        assert_eq!(
            billing_units(BillingPeriod::Daily, &duration),
            Decimal::from(5)
        );
    }

    #[test]
    fn weekly_units_round_up() {
        let duration = ProjectDuration {
            start_date: Some(date(2026, 3, 1)),
            end_date: Some(date(2026, 3, 8)),
            estimated_hours: None,
        };
        assert_eq!(
            billing_units(BillingPeriod::Weekly, &duration),
            Decimal::from(2)
        );
    }

    #[test]
    fn partial_range_defaults_to_one_unit() {
        let duration = ProjectDuration {
            start_date: Some(date(2026, 3, 1)),
            end_date: None,
            estimated_hours: None,
        };
        assert_eq!(billing_units(BillingPeriod::Daily, &duration), Decimal::ONE);
        assert_eq!(
            billing_units(BillingPeriod::Weekly, &duration),
            Decimal::ONE
        );
    }
}
